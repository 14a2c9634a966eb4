//! Persisted row shapes
//!
//! The engine does not own storage. These are the rows a persistence layer
//! stores per night and per generated advice, plus the helpers that map score
//! results onto them.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::SleepinError;
use crate::types::{Advice, AdviceCategory, SleepQuality, SleepScoreInput, SleepScoreResult};

/// One night's stored sleep log.
///
/// Everything except the date and the clock times is optional: rows written
/// by older app versions may lack the computed columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SleepRecord {
    /// Night this record belongs to (YYYY-MM-DD)
    pub date: NaiveDate,
    #[serde(with = "crate::time::hhmm")]
    pub bedtime: NaiveTime,
    #[serde(with = "crate::time::hhmm")]
    pub waketime: NaiveTime,
    #[serde(default)]
    pub total_hours: Option<f64>,
    #[serde(default)]
    pub score: Option<u32>,
    #[serde(default)]
    pub sleep_quality: Option<SleepQuality>,
    #[serde(default)]
    pub awakenings: Option<u32>,
    #[serde(default)]
    pub sleep_latency: Option<u32>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub dream: Option<String>,
    #[serde(default)]
    pub mood: Option<String>,
}

impl SleepRecord {
    /// Build the stored row for a scored night
    pub fn from_scored(date: NaiveDate, input: &SleepScoreInput, result: &SleepScoreResult) -> Self {
        Self {
            date,
            bedtime: input.bedtime,
            waketime: input.waketime,
            total_hours: Some(result.total_hours),
            score: Some(result.total_score),
            sleep_quality: Some(input.sleep_quality),
            awakenings: Some(input.awakenings),
            sleep_latency: Some(input.sleep_latency),
            tags: Some(input.tags.iter().cloned().collect()),
            dream: None,
            mood: None,
        }
    }

    /// Tags serialized for a single text column
    pub fn tags_column(&self) -> Result<String, SleepinError> {
        let tags: &[String] = self.tags.as_deref().unwrap_or(&[]);
        Ok(serde_json::to_string(tags)?)
    }
}

/// Parse a stored tags column. Malformed values read as no tags.
pub fn parse_tags_column(column: &str) -> Vec<String> {
    serde_json::from_str(column).unwrap_or_default()
}

/// Parse a `YYYY-MM-DD` date
pub fn parse_date(value: &str) -> Result<NaiveDate, SleepinError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| SleepinError::InvalidDate(value.to_string()))
}

/// Append-only advice history entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdviceLogEntry {
    pub id: Uuid,
    pub date: NaiveDate,
    pub advice_text: String,
    pub advice_type: AdviceCategory,
    pub created_at: DateTime<Utc>,
}

impl AdviceLogEntry {
    pub fn new(date: NaiveDate, advice: &Advice) -> Self {
        Self {
            id: Uuid::new_v4(),
            date,
            advice_text: advice.text.clone(),
            advice_type: advice.category,
            created_at: Utc::now(),
        }
    }
}
