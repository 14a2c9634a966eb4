//! Character growth and leveling
//!
//! Completed tasks award growth points on a convex curve. Points drive the
//! character's size, level and growth stage; the latest sleep score picks the
//! mood of the displayed variant.

use crate::types::{GrowthStage, GrowthState, QualityBand, TaskDifficulty, Variant};

/// Points per difficulty level, indexed by `level - 1`
const DIFFICULTY_POINTS: [u32; 5] = [1, 2, 3, 5, 8];

/// Character size at zero points
pub const BASE_SIZE: u64 = 80;
/// Size gained per point
pub const SIZE_PER_POINT: u64 = 2;
/// Points per level
pub const POINTS_PER_LEVEL: u32 = 10;

/// Points needed for the intermediate stage
pub const INTERMEDIATE_STAGE_POINTS: u32 = 30;
/// Points needed for the final stage
pub const FINAL_STAGE_POINTS: u32 = 100;

/// Points awarded for completing a task. No difficulty counts as level 1.
pub fn points_for_task_difficulty(difficulty: Option<TaskDifficulty>) -> u32 {
    let level = difficulty.map_or(TaskDifficulty::MIN, |d| d.level());
    DIFFICULTY_POINTS[usize::from(level - 1)]
}

impl GrowthState {
    /// Derive size and level from a point total
    pub fn from_points(total_points: u32) -> Self {
        Self {
            total_points,
            size: BASE_SIZE + u64::from(total_points) * SIZE_PER_POINT,
            level: total_points / POINTS_PER_LEVEL + 1,
        }
    }
}

impl Default for GrowthState {
    fn default() -> Self {
        Self::from_points(0)
    }
}

/// Add `delta` points to a running total
pub fn apply_growth(current_total: u32, delta: u32) -> GrowthState {
    GrowthState::from_points(current_total.saturating_add(delta))
}

/// Quality band for a score. A missing (or zero) score reads as normal.
pub fn quality_band(score: Option<u32>) -> QualityBand {
    match score {
        None | Some(0) => QualityBand::Normal,
        Some(s) if s >= 80 => QualityBand::Good,
        Some(s) if s >= 60 => QualityBand::Normal,
        Some(_) => QualityBand::Poor,
    }
}

pub fn growth_stage(total_points: u32) -> GrowthStage {
    if total_points >= FINAL_STAGE_POINTS {
        GrowthStage::Final
    } else if total_points >= INTERMEDIATE_STAGE_POINTS {
        GrowthStage::Intermediate
    } else {
        GrowthStage::Initial
    }
}

/// Pick the character variant to display
pub fn select_variant(score: Option<u32>, total_points: u32) -> Variant {
    Variant {
        quality: quality_band(score),
        stage: growth_stage(total_points),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn difficulty(level: i64) -> Option<TaskDifficulty> {
        Some(TaskDifficulty::new(level).unwrap())
    }

    #[test]
    fn test_difficulty_points() {
        assert_eq!(points_for_task_difficulty(difficulty(1)), 1);
        assert_eq!(points_for_task_difficulty(difficulty(2)), 2);
        assert_eq!(points_for_task_difficulty(difficulty(3)), 3);
        assert_eq!(points_for_task_difficulty(difficulty(4)), 5);
        assert_eq!(points_for_task_difficulty(difficulty(5)), 8);
        assert_eq!(points_for_task_difficulty(None), 1);
    }

    #[test]
    fn test_apply_growth() {
        assert_eq!(
            apply_growth(0, 5),
            GrowthState {
                total_points: 5,
                size: 90,
                level: 1
            }
        );
        assert_eq!(
            apply_growth(95, 5),
            GrowthState {
                total_points: 100,
                size: 280,
                level: 11
            }
        );
    }

    #[test]
    fn test_baseline_state() {
        let state = GrowthState::default();
        assert_eq!(state.total_points, 0);
        assert_eq!(state.size, 80);
        assert_eq!(state.level, 1);
    }

    #[test]
    fn test_size_is_unbounded() {
        // No cap on size or level; a product ceiling would change this test.
        let state = apply_growth(u32::MAX - 1, 10);
        assert_eq!(state.total_points, u32::MAX);
        assert_eq!(state.size, 80 + u64::from(u32::MAX) * 2);
        assert_eq!(state.level, u32::MAX / 10 + 1);
    }

    #[test]
    fn test_quality_band() {
        assert_eq!(quality_band(Some(80)), QualityBand::Good);
        assert_eq!(quality_band(Some(79)), QualityBand::Normal);
        assert_eq!(quality_band(Some(60)), QualityBand::Normal);
        assert_eq!(quality_band(Some(59)), QualityBand::Poor);
        assert_eq!(quality_band(None), QualityBand::Normal);
        assert_eq!(quality_band(Some(0)), QualityBand::Normal);
    }

    #[test]
    fn test_growth_stage() {
        assert_eq!(growth_stage(0), GrowthStage::Initial);
        assert_eq!(growth_stage(29), GrowthStage::Initial);
        assert_eq!(growth_stage(30), GrowthStage::Intermediate);
        assert_eq!(growth_stage(99), GrowthStage::Intermediate);
        assert_eq!(growth_stage(100), GrowthStage::Final);
    }

    #[test]
    fn test_select_variant() {
        let variant = select_variant(Some(45), 42);
        assert_eq!(variant.quality, QualityBand::Poor);
        assert_eq!(variant.stage, GrowthStage::Intermediate);
        assert_eq!(variant.file_name(), "sleepin_poor_intermediate.png");
    }
}
