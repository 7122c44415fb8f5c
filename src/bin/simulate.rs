use chrono::{SecondsFormat, Utc};
use clap::Parser;
use ghost_leg::config::{ConfigError, LadderConfig};
use ghost_leg::constants::normalize_lane_count;
use ghost_leg::resolver::{final_lanes, is_permutation};
use ghost_leg::rng::Rng;
use ghost_leg::round::GameRound;
use ghost_leg::types::Outcome;
use serde::Serialize;
use serde_json::{json, Value};
use std::io;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

const MAX_ROUNDS: usize = 100_000;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    #[arg(long)]
    lanes: Option<i64>,
    #[arg(long)]
    rows: Option<usize>,
    #[arg(long)]
    min_rungs: Option<usize>,
    #[arg(long)]
    max_rungs: Option<usize>,
    #[arg(long)]
    width: Option<f32>,
    #[arg(long)]
    height: Option<f32>,
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long)]
    rounds: Option<usize>,
    #[arg(long)]
    match_id: Option<String>,
    #[arg(long)]
    summary_out: Option<PathBuf>,
}

#[derive(Clone, Debug, Serialize)]
struct RoundResultLine {
    round: usize,
    seed: u32,
    #[serde(rename = "laneCount")]
    lane_count: usize,
    #[serde(rename = "rungCount")]
    rung_count: usize,
    #[serde(rename = "finalLanes")]
    final_lanes: Vec<usize>,
    #[serde(rename = "winnerStartLane")]
    winner_start_lane: Option<usize>,
    #[serde(rename = "winnerFinalLane")]
    winner_final_lane: Option<usize>,
    anomalies: Vec<String>,
}

#[derive(Clone, Debug, Serialize)]
struct RunSummary {
    #[serde(rename = "matchId")]
    match_id: String,
    #[serde(rename = "generatedAtIso")]
    generated_at_iso: String,
    #[serde(rename = "startedAtMs")]
    started_at_ms: u64,
    #[serde(rename = "finishedAtMs")]
    finished_at_ms: u64,
    #[serde(rename = "roundCount")]
    round_count: usize,
    #[serde(rename = "anomalyCount")]
    anomaly_count: usize,
    #[serde(rename = "winsByStartLane")]
    wins_by_start_lane: Vec<usize>,
    config: LadderConfig,
    rounds: Vec<RoundResultLine>,
}

#[derive(Clone, Debug, Serialize)]
struct StructuredLogLine {
    #[serde(rename = "timestampMs")]
    timestamp_ms: u64,
    level: String,
    event: String,
    #[serde(rename = "matchId")]
    match_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    round: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    seed: Option<u32>,
    details: Value,
}

fn main() {
    let cli = Cli::parse();
    let run_started_at_ms = now_ms();
    let base_seed = cli.seed.unwrap_or(run_started_at_ms);
    let match_id = cli
        .match_id
        .clone()
        .unwrap_or_else(|| default_match_id(normalize_seed(base_seed), run_started_at_ms));

    let config = match resolve_config(&cli) {
        Ok(config) => config,
        Err(error) => {
            emit_log(
                "error",
                "config_invalid",
                &match_id,
                None,
                None,
                json!({ "error": error.to_string() }),
            );
            std::process::exit(2);
        }
    };
    let round_count = cli.rounds.unwrap_or(1).clamp(1, MAX_ROUNDS);

    emit_log(
        "info",
        "run_started",
        &match_id,
        None,
        None,
        json!({
            "rounds": round_count,
            "laneCount": config.lane_count,
            "rowCount": config.row_count,
            "minRungsPerGap": config.min_rungs_per_gap,
            "maxRungsPerGap": config.max_rungs_per_gap,
        }),
    );

    let mut results = Vec::with_capacity(round_count);
    for index in 0..round_count {
        let seed = normalize_seed(base_seed.wrapping_add(index as u64));
        let result = run_round(&config, index, seed);
        for anomaly in &result.anomalies {
            emit_log(
                "warn",
                "anomaly_detected",
                &match_id,
                Some(index),
                Some(seed),
                json!({ "message": anomaly }),
            );
        }
        println!("{}", to_json_line(&result));
        results.push(result);
    }

    let summary = build_run_summary(
        match_id.clone(),
        &config,
        run_started_at_ms,
        now_ms(),
        results,
    );

    let mut summary_out_written: Option<String> = None;
    if let Some(path) = cli.summary_out.as_ref() {
        if let Err(error) = write_summary(path, &summary) {
            emit_log(
                "error",
                "summary_write_failed",
                &match_id,
                None,
                None,
                json!({
                    "path": path.to_string_lossy(),
                    "error": error.to_string(),
                }),
            );
            std::process::exit(2);
        }
        summary_out_written = Some(path.to_string_lossy().to_string());
    }

    emit_log(
        "info",
        "run_finished",
        &match_id,
        None,
        None,
        json!({
            "roundCount": summary.round_count,
            "anomalyCount": summary.anomaly_count,
            "winsByStartLane": summary.wins_by_start_lane,
            "summaryOut": summary_out_written,
        }),
    );

    if summary.anomaly_count > 0 {
        std::process::exit(1);
    }
}

fn resolve_config(cli: &Cli) -> Result<LadderConfig, ConfigError> {
    let mut config = match cli.config.as_deref() {
        Some(path) => LadderConfig::load(path)?,
        None => LadderConfig::default(),
    };
    if cli.lanes.is_some() {
        config.lane_count = normalize_lane_count(cli.lanes);
    }
    if let Some(rows) = cli.rows {
        config.row_count = rows;
    }
    if let Some(min_rungs) = cli.min_rungs {
        config.min_rungs_per_gap = min_rungs;
    }
    if let Some(max_rungs) = cli.max_rungs {
        config.max_rungs_per_gap = max_rungs;
    }
    if let Some(width) = cli.width {
        config.viewport.width = width;
    }
    if let Some(height) = cli.height {
        config.viewport.height = height;
    }
    config.validate()?;
    Ok(config)
}

fn run_round(config: &LadderConfig, index: usize, seed: u32) -> RoundResultLine {
    let mut rng = Rng::new(seed);
    let mut line = RoundResultLine {
        round: index,
        seed,
        lane_count: config.lane_count,
        rung_count: 0,
        final_lanes: Vec::new(),
        winner_start_lane: None,
        winner_final_lane: None,
        anomalies: Vec::new(),
    };

    let mut round = match GameRound::new(config, &mut rng) {
        Ok(round) => round,
        Err(error) => {
            line.anomalies.push(format!("round setup failed: {error}"));
            return line;
        }
    };
    if let Err(error) = round.start() {
        line.anomalies.push(format!("round start failed: {error}"));
        return line;
    }
    if let Err(error) = round.finish() {
        line.anomalies.push(format!("round finish failed: {error}"));
    }

    line.rung_count = round.topology().rungs().len();
    line.final_lanes = round.routes().iter().map(|route| route.final_lane).collect();
    line.winner_start_lane = round.winner_start_lane().ok();
    line.winner_final_lane = Some(round.labeling().winner());
    line.anomalies = collect_round_anomalies(&round);
    line
}

fn collect_round_anomalies(round: &GameRound) -> Vec<String> {
    let mut anomalies = Vec::new();
    if let Err(error) = round.topology().check_invariants() {
        anomalies.push(format!("topology invariant broken: {error}"));
    }

    let finals: Vec<usize> = round.routes().iter().map(|route| route.final_lane).collect();
    if !is_permutation(&finals) || finals.len() != round.topology().lane_count() {
        anomalies.push(format!("final lanes are not a permutation: {finals:?}"));
    }
    if finals != final_lanes(round.topology()) {
        anomalies.push("traced routes disagree with resolved lanes".to_string());
    }

    let grid = round.grid();
    let finish_row = round.topology().finish_row();
    for route in round.routes() {
        if route.points.first().copied() != grid.point(0, route.start_lane) {
            anomalies.push(format!("route {} does not leave the start rail", route.start_lane));
        }
        if route.points.last().copied() != grid.point(finish_row, route.final_lane) {
            anomalies.push(format!("route {} does not reach the finish rail", route.start_lane));
        }
    }

    let winners = round
        .labeling()
        .outcomes()
        .iter()
        .filter(|outcome| **outcome == Outcome::Win)
        .count();
    if winners != 1 {
        anomalies.push(format!("expected exactly one winner, found {winners}"));
    }
    anomalies
}

fn build_run_summary(
    match_id: String,
    config: &LadderConfig,
    started_at_ms: u64,
    finished_at_ms: u64,
    rounds: Vec<RoundResultLine>,
) -> RunSummary {
    let mut wins_by_start_lane = vec![0usize; config.lane_count];
    let mut anomaly_count = 0;
    for round in &rounds {
        anomaly_count += round.anomalies.len();
        if let Some(slot) = round
            .winner_start_lane
            .and_then(|lane| wins_by_start_lane.get_mut(lane))
        {
            *slot += 1;
        }
    }
    RunSummary {
        match_id,
        generated_at_iso: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        started_at_ms,
        finished_at_ms,
        round_count: rounds.len(),
        anomaly_count,
        wins_by_start_lane,
        config: config.clone(),
        rounds,
    }
}

fn normalize_seed(seed: u64) -> u32 {
    seed as u32
}

fn default_match_id(seed: u32, timestamp_ms: u64) -> String {
    format!("ladder-{seed}-{timestamp_ms}")
}

fn emit_log(
    level: &str,
    event: &str,
    match_id: &str,
    round: Option<usize>,
    seed: Option<u32>,
    details: Value,
) {
    let log_line = StructuredLogLine {
        timestamp_ms: now_ms(),
        level: level.to_string(),
        event: event.to_string(),
        match_id: match_id.to_string(),
        round,
        seed,
        details,
    };
    eprintln!("{}", to_json_line(&log_line));
}

fn to_json_line<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value)
        .unwrap_or_else(|error| json!({ "serializeError": error.to_string() }).to_string())
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

fn write_summary(path: &Path, summary: &RunSummary) -> io::Result<()> {
    let summary_text = serde_json::to_string_pretty(summary)?;
    std::fs::write(path, summary_text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_cli(args: &[&str]) -> Cli {
        let mut argv = vec!["simulate"];
        argv.extend_from_slice(args);
        Cli::parse_from(argv)
    }

    #[test]
    fn default_match_id_contains_seed_and_timestamp() {
        assert_eq!(default_match_id(42, 123456789), "ladder-42-123456789");
    }

    #[test]
    fn cli_overrides_default_config() {
        let cli = make_cli(&["--lanes", "4", "--rows", "6", "--max-rungs", "5"]);
        let config = resolve_config(&cli).expect("valid config");
        assert_eq!(config.lane_count, 4);
        assert_eq!(config.row_count, 6);
        assert_eq!(config.min_rungs_per_gap, 2);
        assert_eq!(config.max_rungs_per_gap, 5);
    }

    #[test]
    fn cli_lane_count_is_clamped() {
        let config = resolve_config(&make_cli(&["--lanes", "40"])).expect("valid config");
        assert_eq!(config.lane_count, 10);
        let config = resolve_config(&make_cli(&["--lanes", "1"])).expect("valid config");
        assert_eq!(config.lane_count, 2);
    }

    #[test]
    fn inconsistent_rung_bounds_are_rejected() {
        let cli = make_cli(&["--rows", "4"]);
        assert!(matches!(resolve_config(&cli), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn healthy_rounds_report_no_anomalies() {
        let config = LadderConfig::default();
        for seed in 0..50u32 {
            let line = run_round(&config, seed as usize, seed);
            assert!(line.anomalies.is_empty(), "seed={seed}: {:?}", line.anomalies);
            assert_eq!(line.final_lanes.len(), config.lane_count);
            assert!(line.winner_start_lane.is_some());
            assert!(line.rung_count >= 2 * (config.lane_count - 1));
        }
    }

    #[test]
    fn build_run_summary_counts_wins_per_start_lane() {
        let config = LadderConfig {
            lane_count: 3,
            ..LadderConfig::default()
        };
        let rounds: Vec<RoundResultLine> = (0..30u32)
            .map(|seed| run_round(&config, seed as usize, seed))
            .collect();
        let summary = build_run_summary("ladder-1-1".to_string(), &config, 1, 2, rounds);
        assert_eq!(summary.round_count, 30);
        assert_eq!(summary.anomaly_count, 0);
        assert_eq!(summary.wins_by_start_lane.len(), 3);
        assert_eq!(summary.wins_by_start_lane.iter().sum::<usize>(), 30);
    }

    #[test]
    fn write_summary_returns_error_when_parent_does_not_exist() {
        let now = now_ms();
        let target = std::env::temp_dir()
            .join(format!("ghost-leg-missing-{now}"))
            .join("summary.json");
        let summary = build_run_summary(
            "ladder-1-1".to_string(),
            &LadderConfig::default(),
            1,
            2,
            Vec::new(),
        );
        assert!(write_summary(&target, &summary).is_err());
    }
}
