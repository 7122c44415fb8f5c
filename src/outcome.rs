use serde::Serialize;

use crate::constants::{LABEL_PLAYER, MIN_LANE_COUNT};
use crate::error::LadderError;
use crate::rng::RandomSource;
use crate::types::Outcome;

/// Result per finishing lane. Exactly one lane wins.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Labeling {
    outcomes: Vec<Outcome>,
}

impl Labeling {
    pub fn with_winner(lane_count: usize, winner: usize) -> Result<Self, LadderError> {
        if lane_count < MIN_LANE_COUNT {
            return Err(LadderError::invalid(format!(
                "lane count must be at least {MIN_LANE_COUNT}, got {lane_count}"
            )));
        }
        if winner >= lane_count {
            return Err(LadderError::invalid(format!(
                "winning lane {winner} is outside {lane_count} lanes"
            )));
        }
        let outcomes = (0..lane_count)
            .map(|lane| if lane == winner { Outcome::Win } else { Outcome::Lose })
            .collect();
        Ok(Self { outcomes })
    }

    pub fn lane_count(&self) -> usize {
        self.outcomes.len()
    }

    pub fn winner(&self) -> usize {
        self.outcomes
            .iter()
            .position(|outcome| *outcome == Outcome::Win)
            .unwrap_or(0)
    }

    pub fn outcome(&self, lane: usize) -> Option<Outcome> {
        self.outcomes.get(lane).copied()
    }

    pub fn outcomes(&self) -> &[Outcome] {
        &self.outcomes
    }

    pub fn labels(&self) -> Vec<String> {
        self.outcomes
            .iter()
            .map(|outcome| outcome.label().to_string())
            .collect()
    }
}

pub fn assign_outcomes<R: RandomSource>(
    lane_count: usize,
    rng: &mut R,
) -> Result<Labeling, LadderError> {
    let winner = rng.next_int(lane_count);
    Labeling::with_winner(lane_count, winner)
}

pub fn player_labels(lane_count: usize) -> Vec<String> {
    (1..=lane_count)
        .map(|index| format!("{LABEL_PLAYER}{index}"))
        .collect()
}
