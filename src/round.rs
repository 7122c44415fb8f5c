use crate::config::LadderConfig;
use crate::error::LadderError;
use crate::grid::CoordinateGrid;
use crate::outcome::{assign_outcomes, player_labels, Labeling};
use crate::resolver::trace;
use crate::rng::RandomSource;
use crate::topology::{generate, Topology};
use crate::types::{LaneResult, Outcome, Route, RoundPhase, RoundView};

/// One game round: ladder, geometry, outcome labels and, once started, routes.
#[derive(Clone, Debug)]
pub struct GameRound {
    config: LadderConfig,
    player_labels: Vec<String>,
    topology: Topology,
    grid: CoordinateGrid,
    labeling: Labeling,
    routes: Vec<Route>,
    phase: RoundPhase,
}

impl GameRound {
    pub fn new<R: RandomSource>(config: &LadderConfig, rng: &mut R) -> Result<Self, LadderError> {
        config.validate()?;
        let grid = CoordinateGrid::build(
            config.lane_count,
            config.row_count,
            config.viewport.width,
            config.viewport.height,
        )?;
        let labeling = assign_outcomes(config.lane_count, rng)?;
        let topology = generate_for(config, rng)?;

        Ok(Self {
            config: config.clone(),
            player_labels: player_labels(config.lane_count),
            topology,
            grid,
            labeling,
            routes: Vec::new(),
            phase: RoundPhase::Ready,
        })
    }

    pub fn config(&self) -> &LadderConfig {
        &self.config
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    pub fn grid(&self) -> &CoordinateGrid {
        &self.grid
    }

    pub fn labeling(&self) -> &Labeling {
        &self.labeling
    }

    pub fn player_labels(&self) -> &[String] {
        &self.player_labels
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn start(&mut self) -> Result<&[Route], LadderError> {
        if self.phase != RoundPhase::Ready {
            return Err(LadderError::AlreadyStarted);
        }
        self.routes = trace(&self.topology, &self.grid)?;
        self.phase = RoundPhase::Playing;
        Ok(&self.routes)
    }

    pub fn finish(&mut self) -> Result<(), LadderError> {
        if self.phase != RoundPhase::Playing {
            return Err(LadderError::RoundNotStarted);
        }
        self.phase = RoundPhase::Finished;
        Ok(())
    }

    /// Redraws rungs and outcome labels; the grid is kept.
    pub fn reset<R: RandomSource>(&mut self, rng: &mut R) -> Result<(), LadderError> {
        self.ensure_idle()?;
        let labeling = assign_outcomes(self.config.lane_count, rng)?;
        let topology = generate_for(&self.config, rng)?;
        self.labeling = labeling;
        self.topology = topology;
        self.routes.clear();
        self.phase = RoundPhase::Ready;
        Ok(())
    }

    pub fn reroll_outcomes<R: RandomSource>(&mut self, rng: &mut R) -> Result<(), LadderError> {
        self.ensure_idle()?;
        self.labeling = assign_outcomes(self.config.lane_count, rng)?;
        self.routes.clear();
        self.phase = RoundPhase::Ready;
        Ok(())
    }

    pub fn reconfigure<R: RandomSource>(
        &mut self,
        config: &LadderConfig,
        rng: &mut R,
    ) -> Result<(), LadderError> {
        self.ensure_idle()?;
        *self = Self::new(config, rng)?;
        Ok(())
    }

    pub fn results(&self) -> Result<Vec<LaneResult>, LadderError> {
        if self.phase == RoundPhase::Ready {
            return Err(LadderError::RoundNotStarted);
        }
        self.routes
            .iter()
            .map(|route| {
                let outcome = self
                    .labeling
                    .outcome(route.final_lane)
                    .ok_or(LadderError::GridMismatch)?;
                Ok(LaneResult {
                    player: self.player_labels[route.start_lane].clone(),
                    start_lane: route.start_lane,
                    final_lane: route.final_lane,
                    outcome,
                })
            })
            .collect()
    }

    pub fn winner_start_lane(&self) -> Result<usize, LadderError> {
        self.results()?
            .into_iter()
            .find(|result| result.outcome == Outcome::Win)
            .map(|result| result.start_lane)
            .ok_or(LadderError::GridMismatch)
    }

    pub fn view(&self) -> Result<RoundView, LadderError> {
        let result_labels = match self.phase {
            RoundPhase::Finished => Some(self.labeling.labels()),
            _ => None,
        };
        Ok(RoundView {
            phase: self.phase,
            player_labels: self.player_labels.clone(),
            result_labels,
            rails: self.grid.vertical_rails(),
            rungs: self.grid.rung_segments(&self.topology)?,
            routes: self.routes.clone(),
        })
    }

    fn ensure_idle(&self) -> Result<(), LadderError> {
        if self.phase == RoundPhase::Playing {
            return Err(LadderError::RoundInProgress);
        }
        Ok(())
    }
}

fn generate_for<R: RandomSource>(
    config: &LadderConfig,
    rng: &mut R,
) -> Result<Topology, LadderError> {
    generate(
        config.lane_count,
        config.row_count,
        config.min_rungs_per_gap,
        config.max_rungs_per_gap,
        rng,
    )
}
