//! Error types for Sleepin

use thiserror::Error;

/// Errors that can occur at the boundaries of the engine.
///
/// The scoring functions themselves are total; errors only come from parsing
/// caller-supplied values (clock strings, dates, JSON, difficulty levels).
#[derive(Debug, Error)]
pub enum SleepinError {
    #[error("Invalid clock time (expected HH:MM): {0}")]
    InvalidTime(String),

    #[error("Invalid date (expected YYYY-MM-DD): {0}")]
    InvalidDate(String),

    #[error("Unknown sleep quality: {0}")]
    UnknownQuality(String),

    #[error("Task difficulty must be between 1 and 5, got {0}")]
    InvalidDifficulty(i64),

    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),
}
