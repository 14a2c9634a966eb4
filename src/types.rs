//! Core types for the Sleepin engine
//!
//! This module defines the data structures passed into and out of each
//! component: score inputs and results, advice, growth state, character
//! variants and trends.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::error::SleepinError;

/// Self-reported sleep quality for a night
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SleepQuality {
    #[serde(alias = "よく眠れた")]
    WellRested,
    #[serde(alias = "普通")]
    Average,
    #[serde(alias = "浅かった")]
    Shallow,
}

impl SleepQuality {
    pub fn as_str(&self) -> &'static str {
        match self {
            SleepQuality::WellRested => "well_rested",
            SleepQuality::Average => "average",
            SleepQuality::Shallow => "shallow",
        }
    }
}

impl FromStr for SleepQuality {
    type Err = SleepinError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "well_rested" | "well-rested" | "よく眠れた" => Ok(SleepQuality::WellRested),
            "average" | "普通" => Ok(SleepQuality::Average),
            "shallow" | "浅かった" => Ok(SleepQuality::Shallow),
            other => Err(SleepinError::UnknownQuality(other.to_string())),
        }
    }
}

impl fmt::Display for SleepQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Environment tags that carry weight in the environment score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnvironmentTag {
    Exercise,
    NoCaffeine,
    Bath,
    Temperature,
}

impl EnvironmentTag {
    /// Resolve a free-form tag label. Unrecognized labels return `None`.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim() {
            "exercise" | "運動" => Some(EnvironmentTag::Exercise),
            "no_caffeine" | "no-caffeine" | "カフェインなし" => Some(EnvironmentTag::NoCaffeine),
            "bath" | "入浴" => Some(EnvironmentTag::Bath),
            "temperature" | "室温適正" => Some(EnvironmentTag::Temperature),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EnvironmentTag::Exercise => "exercise",
            EnvironmentTag::NoCaffeine => "no_caffeine",
            EnvironmentTag::Bath => "bath",
            EnvironmentTag::Temperature => "temperature",
        }
    }
}

/// Raw inputs for one night's score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SleepScoreInput {
    /// Time the user went to bed
    #[serde(with = "crate::time::hhmm")]
    pub bedtime: NaiveTime,
    /// Time the user woke up
    #[serde(with = "crate::time::hhmm")]
    pub waketime: NaiveTime,
    pub sleep_quality: SleepQuality,
    /// Number of mid-sleep awakenings
    #[serde(default)]
    pub awakenings: u32,
    /// Minutes between going to bed and falling asleep
    #[serde(default)]
    pub sleep_latency: u32,
    /// Environment labels; unrecognized labels are kept but score nothing
    #[serde(default)]
    pub tags: BTreeSet<String>,
}

/// One weighted component of the score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComponentScore {
    /// Component score (0-100)
    pub score: f64,
    /// Weight of this component (fraction of 1)
    pub weight: f64,
    /// `score * weight`
    pub weighted: f64,
}

/// Per-component breakdown of a sleep score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub sleep_time: ComponentScore,
    pub deep_sleep: ComponentScore,
    pub awakenings: ComponentScore,
    pub latency: ComponentScore,
    pub environment: ComponentScore,
}

impl ScoreBreakdown {
    pub fn components(&self) -> [&ComponentScore; 5] {
        [
            &self.sleep_time,
            &self.deep_sleep,
            &self.awakenings,
            &self.latency,
            &self.environment,
        ]
    }
}

/// Output of the score engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SleepScoreResult {
    /// Total score (0-100)
    pub total_score: u32,
    pub breakdown: ScoreBreakdown,
    /// Elapsed hours between bedtime and waketime
    pub total_hours: f64,
}

/// Advice category, used to pick detailed tips
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdviceCategory {
    Breathing,
    Bgm,
    Stretch,
    SleepHygiene,
}

impl AdviceCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdviceCategory::Breathing => "breathing",
            AdviceCategory::Bgm => "bgm",
            AdviceCategory::Stretch => "stretch",
            AdviceCategory::SleepHygiene => "sleep_hygiene",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdvicePriority {
    Low,
    Medium,
    High,
}

/// A piece of advice selected for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Advice {
    pub text: String,
    pub category: AdviceCategory,
    pub priority: AdvicePriority,
}

/// Task difficulty level (1-5)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct TaskDifficulty(u8);

impl TaskDifficulty {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(level: i64) -> Result<Self, SleepinError> {
        if (i64::from(Self::MIN)..=i64::from(Self::MAX)).contains(&level) {
            Ok(Self(level as u8))
        } else {
            Err(SleepinError::InvalidDifficulty(level))
        }
    }

    pub fn level(&self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for TaskDifficulty {
    type Error = SleepinError;

    fn try_from(level: i64) -> Result<Self, Self::Error> {
        Self::new(level)
    }
}

impl From<TaskDifficulty> for u8 {
    fn from(difficulty: TaskDifficulty) -> Self {
        difficulty.0
    }
}

/// Accumulated growth points and the values derived from them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrowthState {
    pub total_points: u32,
    /// Display size of the character (unbounded)
    pub size: u64,
    /// Level, starting at 1 (unbounded)
    pub level: u32,
}

/// Coarse bucketing of the sleep score for asset selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityBand {
    Poor,
    Normal,
    Good,
}

impl QualityBand {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityBand::Poor => "poor",
            QualityBand::Normal => "normal",
            QualityBand::Good => "good",
        }
    }
}

/// Character growth stage, driven by growth points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GrowthStage {
    Initial,
    Intermediate,
    Final,
}

impl GrowthStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            GrowthStage::Initial => "initial",
            GrowthStage::Intermediate => "intermediate",
            GrowthStage::Final => "final",
        }
    }
}

/// One of the nine character image variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Variant {
    pub quality: QualityBand,
    pub stage: GrowthStage,
}

impl Variant {
    /// Asset file name, e.g. `sleepin_good_final.png`
    pub fn file_name(&self) -> String {
        format!(
            "sleepin_{}_{}.png",
            self.quality.as_str(),
            self.stage.as_str()
        )
    }
}

/// Direction of recent scores relative to the longer window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    InsufficientData,
    Improving,
    Declining,
    Stable,
}

impl Trend {
    pub fn message(&self) -> &'static str {
        match self {
            Trend::InsufficientData => {
                "Keep logging every night and a trend will appear after a few records."
            }
            Trend::Improving => {
                "Your sleep has improved over the last 3 days. Keep it up! 📈"
            }
            Trend::Declining => {
                "Your sleep has slipped over the last 3 days. Look for what changed. 📉"
            }
            Trend::Stable => "Your sleep is steady. Keep this rhythm going.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quality_accepts_legacy_labels() {
        let q: SleepQuality = serde_json::from_str("\"浅かった\"").unwrap();
        assert_eq!(q, SleepQuality::Shallow);
        assert_eq!("よく眠れた".parse::<SleepQuality>().unwrap(), SleepQuality::WellRested);
    }

    #[test]
    fn test_unknown_quality_is_rejected() {
        assert!(matches!(
            "great".parse::<SleepQuality>(),
            Err(SleepinError::UnknownQuality(_))
        ));
        assert!(serde_json::from_str::<SleepQuality>("\"great\"").is_err());
    }

    #[test]
    fn test_difficulty_bounds() {
        assert!(TaskDifficulty::new(0).is_err());
        assert!(TaskDifficulty::new(6).is_err());
        assert_eq!(TaskDifficulty::new(5).unwrap().level(), 5);
        assert!(serde_json::from_str::<TaskDifficulty>("9").is_err());
    }

    #[test]
    fn test_negative_counts_rejected_at_boundary() {
        let json = r#"{"bedtime":"22:00","waketime":"06:00","sleep_quality":"average","awakenings":-1}"#;
        assert!(serde_json::from_str::<SleepScoreInput>(json).is_err());
    }

    #[test]
    fn test_variant_file_name() {
        let variant = Variant {
            quality: QualityBand::Good,
            stage: GrowthStage::Final,
        };
        assert_eq!(variant.file_name(), "sleepin_good_final.png");
    }
}
