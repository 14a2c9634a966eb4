//! Score trend detection
//!
//! Compares the average of the three most recent scores with the average of
//! the whole window.

use serde::{Deserialize, Serialize};

use crate::types::Trend;

/// Scores needed before a trend is reported
pub const MIN_TREND_SCORES: usize = 3;

/// Difference between the recent and overall averages that counts as a trend
pub const TREND_THRESHOLD: f64 = 5.0;

/// Classify recent scores, ordered most recent first.
pub fn trend_message(recent_scores: &[u32]) -> Trend {
    analyze_trend(recent_scores).trend
}

/// Trend with the averages behind it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendReport {
    pub trend: Trend,
    pub message: String,
    /// Average of all supplied scores
    pub average: Option<f64>,
    /// Average of the most recent three scores
    pub recent_average: Option<f64>,
}

pub fn analyze_trend(recent_scores: &[u32]) -> TrendReport {
    if recent_scores.len() < MIN_TREND_SCORES {
        return TrendReport {
            trend: Trend::InsufficientData,
            message: Trend::InsufficientData.message().to_string(),
            average: None,
            recent_average: None,
        };
    }

    let average = mean(recent_scores);
    let recent_average = mean(&recent_scores[..MIN_TREND_SCORES]);

    let trend = if recent_average > average + TREND_THRESHOLD {
        Trend::Improving
    } else if recent_average < average - TREND_THRESHOLD {
        Trend::Declining
    } else {
        Trend::Stable
    };

    TrendReport {
        trend,
        message: trend.message().to_string(),
        average: Some(average),
        recent_average: Some(recent_average),
    }
}

fn mean(values: &[u32]) -> f64 {
    let sum: f64 = values.iter().map(|v| f64::from(*v)).sum();
    sum / values.len() as f64
}
