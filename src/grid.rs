use serde::Serialize;

use crate::constants::{finish_row, grid_row_count};
use crate::error::LadderError;
use crate::topology::{validate_shape, Topology};
use crate::types::{Cell, LineSegment, Point};

/// Drawable position of every `(row, lane)` pair.
///
/// Lanes sit at the middle of equal-width columns. The start rail is at
/// `y = 0` and the finish rail at `y = height`; rung rows `1..=row_count`
/// sit at the middle of equal-height bands, `y = row_height * (row - 0.5)`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CoordinateGrid {
    #[serde(rename = "laneCount")]
    lane_count: usize,
    #[serde(rename = "rowCount")]
    row_count: usize,
    width: f32,
    height: f32,
    points: Vec<Vec<Point>>,
}

impl CoordinateGrid {
    pub fn build(
        lane_count: usize,
        row_count: usize,
        width: f32,
        height: f32,
    ) -> Result<Self, LadderError> {
        validate_shape(lane_count, row_count)?;
        validate_viewport(width, height)?;

        let lane_width = width / lane_count as f32;
        let row_height = height / row_count as f32;
        let last_row = finish_row(row_count);
        let points = (0..grid_row_count(row_count))
            .map(|row| {
                let y = if row == 0 {
                    0.0
                } else if row < last_row {
                    row_height * (row as f32 - 0.5)
                } else {
                    height
                };
                (0..lane_count)
                    .map(|lane| Point {
                        x: lane_width * (lane as f32 + 0.5),
                        y,
                    })
                    .collect()
            })
            .collect();

        Ok(Self {
            lane_count,
            row_count,
            width,
            height,
            points,
        })
    }

    pub fn lane_count(&self) -> usize {
        self.lane_count
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn point(&self, row: usize, lane: usize) -> Option<Point> {
        self.points.get(row).and_then(|row| row.get(lane)).copied()
    }

    pub fn matches(&self, topology: &Topology) -> bool {
        self.lane_count == topology.lane_count() && self.row_count == topology.row_count()
    }

    pub fn vertical_rails(&self) -> Vec<LineSegment> {
        let last_row = finish_row(self.row_count);
        (0..self.lane_count)
            .map(|lane| LineSegment {
                start: self.points[0][lane],
                end: self.points[last_row][lane],
            })
            .collect()
    }

    pub fn rung_segments(&self, topology: &Topology) -> Result<Vec<LineSegment>, LadderError> {
        if !self.matches(topology) {
            return Err(LadderError::GridMismatch);
        }
        let mut out = Vec::new();
        for row in 1..=self.row_count {
            for lane in 0..self.lane_count - 1 {
                if topology.cell(row, lane) == Cell::ConnectsRight {
                    out.push(LineSegment {
                        start: self.points[row][lane],
                        end: self.points[row][lane + 1],
                    });
                }
            }
        }
        Ok(out)
    }
}

fn validate_viewport(width: f32, height: f32) -> Result<(), LadderError> {
    if !width.is_finite() || width < 0.0 {
        return Err(LadderError::invalid(format!("invalid viewport width {width}")));
    }
    if !height.is_finite() || height < 0.0 {
        return Err(LadderError::invalid(format!("invalid viewport height {height}")));
    }
    Ok(())
}
