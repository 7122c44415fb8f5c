use serde::Serialize;

use crate::constants::{finish_row, grid_row_count, MIN_LANE_COUNT};
use crate::error::LadderError;
use crate::rng::RandomSource;
use crate::types::{Cell, Rung};

/// Rung layout of one round.
///
/// Rows `1..=row_count` are rung sites; row 0 and row `row_count + 1` are the
/// start and finish rails and never carry a rung.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Topology {
    #[serde(rename = "laneCount")]
    lane_count: usize,
    #[serde(rename = "rowCount")]
    row_count: usize,
    cells: Vec<Vec<Cell>>,
}

impl Topology {
    pub fn empty(lane_count: usize, row_count: usize) -> Result<Self, LadderError> {
        validate_shape(lane_count, row_count)?;
        Ok(Self {
            lane_count,
            row_count,
            cells: vec![vec![Cell::None; lane_count]; grid_row_count(row_count)],
        })
    }

    pub fn from_rungs(
        lane_count: usize,
        row_count: usize,
        rungs: &[Rung],
    ) -> Result<Self, LadderError> {
        let mut topology = Self::empty(lane_count, row_count)?;
        for rung in rungs {
            topology.place(*rung)?;
        }
        Ok(topology)
    }

    pub fn lane_count(&self) -> usize {
        self.lane_count
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn finish_row(&self) -> usize {
        finish_row(self.row_count)
    }

    pub fn cell(&self, row: usize, lane: usize) -> Cell {
        self.cells
            .get(row)
            .and_then(|cells| cells.get(lane))
            .copied()
            .unwrap_or(Cell::None)
    }

    /// Rungs ordered by gap, then by row.
    pub fn rungs(&self) -> Vec<Rung> {
        let mut out = Vec::new();
        for gap in 0..self.lane_count - 1 {
            for row in 1..=self.row_count {
                if self.cells[row][gap] == Cell::ConnectsRight {
                    out.push(Rung { row, gap });
                }
            }
        }
        out
    }

    pub fn rungs_in_gap(&self, gap: usize) -> Vec<usize> {
        (1..=self.row_count)
            .filter(|row| self.cell(*row, gap) == Cell::ConnectsRight)
            .collect()
    }

    pub fn check_invariants(&self) -> Result<(), LadderError> {
        let rails = [0, self.finish_row()];
        for (row, cells) in self.cells.iter().enumerate() {
            for (lane, cell) in cells.iter().enumerate() {
                match cell {
                    Cell::None => {}
                    _ if rails.contains(&row) => {
                        return Err(LadderError::RungOutOfRange { row, gap: lane });
                    }
                    Cell::ConnectsRight => {
                        if cells.get(lane + 1) != Some(&Cell::ConnectsLeft) {
                            return Err(LadderError::RungCollision { row, lane });
                        }
                    }
                    Cell::ConnectsLeft => {
                        if lane == 0 || cells[lane - 1] != Cell::ConnectsRight {
                            return Err(LadderError::RungCollision { row, lane });
                        }
                    }
                }
            }
        }
        Ok(())
    }

    fn place(&mut self, rung: Rung) -> Result<(), LadderError> {
        let Rung { row, gap } = rung;
        if row == 0 || row > self.row_count || gap + 1 >= self.lane_count {
            return Err(LadderError::RungOutOfRange { row, gap });
        }
        for lane in [gap, gap + 1] {
            if self.cells[row][lane] != Cell::None {
                return Err(LadderError::RungCollision { row, lane });
            }
        }
        self.cells[row][gap] = Cell::ConnectsRight;
        self.cells[row][gap + 1] = Cell::ConnectsLeft;
        Ok(())
    }
}

pub fn generate<R: RandomSource>(
    lane_count: usize,
    row_count: usize,
    min_rungs_per_gap: usize,
    max_rungs_per_gap: usize,
    rng: &mut R,
) -> Result<Topology, LadderError> {
    validate_rung_bounds(row_count, min_rungs_per_gap, max_rungs_per_gap)?;
    let mut topology = Topology::empty(lane_count, row_count)?;

    let mut previous_rows: Vec<usize> = Vec::new();
    for gap in 0..lane_count - 1 {
        // Rows taken by the left neighbour gap already occupy lane `gap`.
        let mut candidates: Vec<usize> = (1..=row_count)
            .filter(|row| !previous_rows.contains(row))
            .collect();
        let upper = max_rungs_per_gap.min(candidates.len());
        let lower = min_rungs_per_gap.min(upper);
        let count = lower + rng.next_int(upper - lower + 1);

        rng.shuffle(&mut candidates);
        candidates.truncate(count);
        for &row in &candidates {
            topology.place(Rung { row, gap })?;
        }
        previous_rows = candidates;
    }

    Ok(topology)
}

pub(crate) fn validate_shape(lane_count: usize, row_count: usize) -> Result<(), LadderError> {
    if lane_count < MIN_LANE_COUNT {
        return Err(LadderError::invalid(format!(
            "lane count must be at least {MIN_LANE_COUNT}, got {lane_count}"
        )));
    }
    if row_count < 1 {
        return Err(LadderError::invalid("row count must be at least 1"));
    }
    Ok(())
}

pub(crate) fn validate_rung_bounds(
    row_count: usize,
    min_rungs_per_gap: usize,
    max_rungs_per_gap: usize,
) -> Result<(), LadderError> {
    if min_rungs_per_gap < 1 {
        return Err(LadderError::invalid("minimum rungs per gap must be at least 1"));
    }
    if min_rungs_per_gap > max_rungs_per_gap {
        return Err(LadderError::invalid(format!(
            "minimum rungs per gap ({min_rungs_per_gap}) exceeds maximum ({max_rungs_per_gap})"
        )));
    }
    if max_rungs_per_gap > row_count {
        return Err(LadderError::invalid(format!(
            "maximum rungs per gap ({max_rungs_per_gap}) exceeds row count ({row_count})"
        )));
    }
    Ok(())
}
