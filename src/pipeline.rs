//! JSON entry points
//!
//! This module provides the public API used by host applications. Stateless
//! functions take and return JSON; `GrowthTracker` owns the growth accumulator
//! between calls.

use tracing::{debug, info, warn};

use crate::advice::generate_advice;
use crate::error::SleepinError;
use crate::growth::{apply_growth, points_for_task_difficulty, select_variant};
use crate::record::{parse_date, SleepRecord};
use crate::score::calculate_sleep_score;
use crate::trend::analyze_trend;
use crate::types::{GrowthState, SleepScoreInput, TaskDifficulty, Variant};

/// Score a night from its JSON input.
///
/// # Example
/// ```ignore
/// let result = score_json(r#"{
///     "bedtime": "22:30",
///     "waketime": "07:00",
///     "sleep_quality": "well_rested",
///     "awakenings": 1,
///     "sleep_latency": 15,
///     "tags": ["exercise", "bath"]
/// }"#)?;
/// ```
pub fn score_json(raw_json: &str) -> Result<String, SleepinError> {
    let input: SleepScoreInput = serde_json::from_str(raw_json)?;
    let result = calculate_sleep_score(&input);
    debug!(
        total_score = result.total_score,
        total_hours = result.total_hours,
        "computed sleep score"
    );
    Ok(serde_json::to_string(&result)?)
}

/// Score a night and return the row to persist for `date` (YYYY-MM-DD).
pub fn score_to_record_json(raw_json: &str, date: &str) -> Result<String, SleepinError> {
    let date = parse_date(date)?;
    let input: SleepScoreInput = serde_json::from_str(raw_json)?;
    let result = calculate_sleep_score(&input);
    let record = SleepRecord::from_scored(date, &input, &result);
    debug!(%date, total_score = result.total_score, "built sleep record");
    Ok(serde_json::to_string(&record)?)
}

/// Select advice for a stored record.
pub fn advice_json(score: u32, record_json: &str) -> Result<String, SleepinError> {
    let record: SleepRecord = serde_json::from_str(record_json)?;
    let advice = generate_advice(score, &record);
    debug!(score, category = advice.category.as_str(), "selected advice");
    Ok(serde_json::to_string(&advice)?)
}

/// Classify a JSON array of recent scores, most recent first.
pub fn trend_json(scores_json: &str) -> Result<String, SleepinError> {
    let scores: Vec<u32> = serde_json::from_str(scores_json)?;
    let report = analyze_trend(&scores);
    Ok(serde_json::to_string(&report)?)
}

/// Owner of the growth accumulator.
///
/// Completing a task is a read-add-write on the point total; taking `&mut self`
/// keeps completions on one tracker strictly sequential. Hosts that share the
/// persisted state between processes must serialize writes themselves.
#[derive(Debug, Default)]
pub struct GrowthTracker {
    state: GrowthState,
}

impl GrowthTracker {
    /// Start at the baseline (0 points, level 1)
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_state(state: GrowthState) -> Self {
        Self {
            state: GrowthState::from_points(state.total_points),
        }
    }

    pub fn state(&self) -> &GrowthState {
        &self.state
    }

    /// Award points for a completed task and return the new state
    pub fn complete_task(&mut self, difficulty: Option<TaskDifficulty>) -> GrowthState {
        let delta = points_for_task_difficulty(difficulty);
        let before = self.state;
        self.state = apply_growth(before.total_points, delta);

        info!(
            delta,
            total_points = self.state.total_points,
            level = self.state.level,
            "task completed"
        );
        if self.state.level > before.level {
            info!(level = self.state.level, "level up");
        }

        self.state
    }

    /// Variant to display for the latest sleep score
    pub fn variant(&self, score: Option<u32>) -> Variant {
        select_variant(score, self.state.total_points)
    }

    /// Load state from JSON. Size and level are re-derived from the point total.
    pub fn load_state(&mut self, json: &str) -> Result<(), SleepinError> {
        let loaded: GrowthState = serde_json::from_str(json)?;
        let derived = GrowthState::from_points(loaded.total_points);
        if derived != loaded {
            warn!(
                total_points = loaded.total_points,
                stored_size = loaded.size,
                stored_level = loaded.level,
                "stored growth state was inconsistent; re-derived size and level"
            );
        }
        self.state = derived;
        Ok(())
    }

    /// Save state to JSON
    pub fn save_state(&self) -> Result<String, SleepinError> {
        Ok(serde_json::to_string(&self.state)?)
    }
}
