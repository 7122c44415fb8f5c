use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{LABEL_LOSE, LABEL_WIN};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Cell {
    None,
    ConnectsRight,
    ConnectsLeft,
}

/// Connector between lane `gap` and lane `gap + 1` at `row`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Rung {
    pub row: usize,
    pub gap: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct LineSegment {
    pub start: Point,
    pub end: Point,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Route {
    #[serde(rename = "startLane")]
    pub start_lane: usize,
    #[serde(rename = "finalLane")]
    pub final_lane: usize,
    pub points: Vec<Point>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Outcome {
    Win,
    Lose,
}

impl Outcome {
    pub fn label(self) -> &'static str {
        match self {
            Self::Win => LABEL_WIN,
            Self::Lose => LABEL_LOSE,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LaneResult {
    pub player: String,
    #[serde(rename = "startLane")]
    pub start_lane: usize,
    #[serde(rename = "finalLane")]
    pub final_lane: usize,
    pub outcome: Outcome,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundPhase {
    Ready,
    Playing,
    Finished,
}

#[derive(Clone, Debug, Serialize)]
pub struct RoundView {
    pub phase: RoundPhase,
    #[serde(rename = "playerLabels")]
    pub player_labels: Vec<String>,
    #[serde(rename = "resultLabels")]
    pub result_labels: Option<Vec<String>>,
    pub rails: Vec<LineSegment>,
    pub rungs: Vec<LineSegment>,
    pub routes: Vec<Route>,
}
