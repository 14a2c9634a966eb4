//! Sleepin - Sleep score engine for the Sleepin sleep and task journal
//!
//! Sleepin turns a night's self-reported sleep log into a weighted 0-100 score
//! and derives what the app shows around it: rule-based advice, a trend over
//! recent nights, and the growth of the character fed by completed tasks.
//!
//! ## Modules
//!
//! - **Score Engine**: bedtime/waketime, quality, awakenings, latency and
//!   environment tags into a score with a five-component breakdown
//! - **Advice / Trend**: ordered rules over a stored record, and a recent-vs-overall
//!   average comparison
//! - **Growth**: task difficulty into points, points into size, level and the
//!   displayed character variant

pub mod advice;
pub mod error;
pub mod growth;
pub mod pipeline;
pub mod record;
pub mod score;
pub mod time;
pub mod trend;
pub mod types;

// FFI bindings for C interop (always available for cdylib/staticlib builds)
pub mod ffi;

pub use advice::generate_advice;
pub use error::SleepinError;
pub use growth::{apply_growth, points_for_task_difficulty, select_variant};
pub use pipeline::{advice_json, score_json, score_to_record_json, trend_json, GrowthTracker};
pub use record::{AdviceLogEntry, SleepRecord};
pub use score::calculate_sleep_score;
pub use time::elapsed_hours;
pub use trend::trend_message;
pub use types::{
    Advice, AdviceCategory, AdvicePriority, GrowthStage, GrowthState, QualityBand, SleepQuality,
    SleepScoreInput, SleepScoreResult, TaskDifficulty, Trend, Variant,
};

/// Engine version
pub const SLEEPIN_VERSION: &str = env!("CARGO_PKG_VERSION");
