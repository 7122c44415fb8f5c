pub const DEFAULT_ROW_COUNT: usize = 10;
pub const MIN_RUNGS_PER_GAP: usize = 2;
pub const MAX_RUNGS_PER_GAP: usize = 8;

pub const MIN_LANE_COUNT: usize = 2;
pub const MAX_LANE_COUNT: usize = 10;
pub const DEFAULT_LANE_COUNT: usize = 6;

pub const DEFAULT_VIEWPORT_WIDTH: f32 = 1080.0;
pub const DEFAULT_VIEWPORT_HEIGHT: f32 = 1600.0;

pub const LABEL_PLAYER: &str = "P";
pub const LABEL_WIN: &str = "WIN";
pub const LABEL_LOSE: &str = "LOSE";

/// Grid rows including the start and finish rails.
pub fn grid_row_count(row_count: usize) -> usize {
    row_count + 2
}

pub fn finish_row(row_count: usize) -> usize {
    row_count + 1
}

pub fn normalize_lane_count(value: Option<i64>) -> usize {
    value
        .unwrap_or(DEFAULT_LANE_COUNT as i64)
        .clamp(MIN_LANE_COUNT as i64, MAX_LANE_COUNT as i64) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_lane_count_clamps_range() {
        assert_eq!(normalize_lane_count(None), 6);
        assert_eq!(normalize_lane_count(Some(-3)), 2);
        assert_eq!(normalize_lane_count(Some(1)), 2);
        assert_eq!(normalize_lane_count(Some(7)), 7);
        assert_eq!(normalize_lane_count(Some(99)), 10);
    }

    #[test]
    fn rails_wrap_rung_rows() {
        assert_eq!(grid_row_count(10), 12);
        assert_eq!(finish_row(10), 11);
        assert_eq!(finish_row(1), 2);
    }
}
