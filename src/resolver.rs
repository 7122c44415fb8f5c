use crate::error::LadderError;
use crate::grid::CoordinateGrid;
use crate::topology::Topology;
use crate::types::{Cell, Route};

pub fn trace(topology: &Topology, grid: &CoordinateGrid) -> Result<Vec<Route>, LadderError> {
    if !grid.matches(topology) {
        return Err(LadderError::GridMismatch);
    }
    (0..topology.lane_count())
        .map(|start_lane| {
            let steps = walk(topology, start_lane);
            let final_lane = steps.last().map(|&(_, lane)| lane).unwrap_or(start_lane);
            let points = steps
                .into_iter()
                .map(|(row, lane)| grid.point(row, lane).ok_or(LadderError::GridMismatch))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Route {
                start_lane,
                final_lane,
                points,
            })
        })
        .collect()
}

pub fn final_lanes(topology: &Topology) -> Vec<usize> {
    (0..topology.lane_count())
        .map(|start_lane| {
            walk(topology, start_lane)
                .last()
                .map(|&(_, lane)| lane)
                .unwrap_or(start_lane)
        })
        .collect()
}

pub fn is_permutation(lanes: &[usize]) -> bool {
    let mut seen = vec![false; lanes.len()];
    for &lane in lanes {
        match seen.get_mut(lane) {
            Some(hit) if !*hit => *hit = true,
            _ => return false,
        }
    }
    true
}

/// `(row, lane)` stops visited from the start rail down to the finish rail.
fn walk(topology: &Topology, start_lane: usize) -> Vec<(usize, usize)> {
    let last_row = topology.finish_row();
    let mut row = 0;
    let mut lane = start_lane;
    let mut steps = vec![(row, lane)];
    while row < last_row {
        match topology.cell(row, lane) {
            Cell::ConnectsRight => {
                lane += 1;
                steps.push((row, lane));
            }
            Cell::ConnectsLeft => {
                lane -= 1;
                steps.push((row, lane));
            }
            Cell::None => {}
        }
        row += 1;
        steps.push((row, lane));
    }
    steps
}
