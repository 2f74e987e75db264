//! Scoring module - points for clears, level bonuses and level targets

use crate::types::{
    BASE_CLEAR_POINTS, COMBO_STEP_POINTS, MOVE_BONUS_POINTS, TIME_BONUS_POINTS,
};

/// Points for one resolution step: `removed * (10 + level + combo * 5)`
pub fn clear_points(removed: u32, level: u32, combo: u32) -> u64 {
    let per_cell = BASE_CLEAR_POINTS as u64 + level as u64 + combo as u64 * COMBO_STEP_POINTS as u64;
    removed as u64 * per_cell
}

/// Level-complete bonus: remaining moves x 25 (or seconds x 15 in timed levels), times level
pub fn completion_bonus(timed: bool, moves_left: u32, time_left: u32, level: u32) -> u64 {
    let base = if timed {
        time_left as u64 * TIME_BONUS_POINTS as u64
    } else {
        moves_left as u64 * MOVE_BONUS_POINTS as u64
    };
    base * level as u64
}

/// Score target of a level, rounded up to the next hundred.
///
/// Scales with board width (relative to 8) and grows by 20% per level.
pub fn target_score(width: usize, level: u32) -> u64 {
    let exp = level.saturating_sub(1) as f64;
    let raw = 500.0 * (width as f64 / 8.0) * 1.2f64.powf(exp);
    ((raw / 100.0).ceil() * 100.0) as u64
}
