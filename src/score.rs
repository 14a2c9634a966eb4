//! Sleep score computation
//!
//! Five sub-scores, each in 0-100, are combined with fixed weights:
//! - Sleep time (30%): 7 hours is the reference optimum
//! - Deep sleep (25%): self-reported quality
//! - Awakenings (20%): 10 points per awakening
//! - Latency (15%): 2 points per minute beyond 15 minutes
//! - Environment (10%): sleep-hygiene tags

use std::collections::BTreeSet;

use crate::time::elapsed_hours;
use crate::types::{
    ComponentScore, EnvironmentTag, ScoreBreakdown, SleepQuality, SleepScoreInput,
    SleepScoreResult,
};

/// Component weights in percent. They sum to 100.
pub const SLEEP_TIME_WEIGHT_PCT: u32 = 30;
pub const DEEP_SLEEP_WEIGHT_PCT: u32 = 25;
pub const AWAKENINGS_WEIGHT_PCT: u32 = 20;
pub const LATENCY_WEIGHT_PCT: u32 = 15;
pub const ENVIRONMENT_WEIGHT_PCT: u32 = 10;

/// Hours of sleep that earn the full sleep-time score
pub const OPTIMAL_SLEEP_HOURS: f64 = 7.0;

/// Latency at or below this many minutes is not penalized
pub const IDEAL_LATENCY_MINUTES: u32 = 15;

const QUALITY_SCORES: [(SleepQuality, f64); 3] = [
    (SleepQuality::WellRested, 100.0),
    (SleepQuality::Average, 70.0),
    (SleepQuality::Shallow, 40.0),
];

const TAG_BONUSES: [(EnvironmentTag, u32); 4] = [
    (EnvironmentTag::Exercise, 5),
    (EnvironmentTag::NoCaffeine, 5),
    (EnvironmentTag::Bath, 3),
    (EnvironmentTag::Temperature, 2),
];

/// Maximum raw environment bonus (all known tags present)
pub const MAX_ENVIRONMENT_BONUS: u32 = 15;

/// Compute the score for one night.
///
/// Pure: identical input always produces identical output.
pub fn calculate_sleep_score(input: &SleepScoreInput) -> SleepScoreResult {
    let total_hours = elapsed_hours(input.bedtime, input.waketime);

    let breakdown = ScoreBreakdown {
        sleep_time: component(sleep_time_score(total_hours), SLEEP_TIME_WEIGHT_PCT),
        deep_sleep: component(deep_sleep_score(input.sleep_quality), DEEP_SLEEP_WEIGHT_PCT),
        awakenings: component(awakenings_score(input.awakenings), AWAKENINGS_WEIGHT_PCT),
        latency: component(latency_score(input.sleep_latency), LATENCY_WEIGHT_PCT),
        environment: component(environment_score(&input.tags), ENVIRONMENT_WEIGHT_PCT),
    };

    let weighted_sum: f64 = breakdown.components().iter().map(|c| c.weighted).sum();
    let total_score = round_half_up(weighted_sum).clamp(0.0, 100.0) as u32;

    SleepScoreResult {
        total_score,
        breakdown,
        total_hours,
    }
}

fn component(score: f64, weight_pct: u32) -> ComponentScore {
    let score = clamp_score(score);
    let weight = f64::from(weight_pct) / 100.0;
    ComponentScore {
        score,
        weight,
        weighted: score * weight,
    }
}

/// Clamp to [0, 100]; NaN becomes 0
fn clamp_score(score: f64) -> f64 {
    if score.is_nan() {
        0.0
    } else {
        score.clamp(0.0, 100.0)
    }
}

/// Round to nearest, ties toward positive infinity
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

fn sleep_time_score(total_hours: f64) -> f64 {
    (total_hours / OPTIMAL_SLEEP_HOURS * 100.0).min(100.0)
}

fn deep_sleep_score(quality: SleepQuality) -> f64 {
    QUALITY_SCORES
        .iter()
        .find(|(q, _)| *q == quality)
        .map(|(_, score)| *score)
        .unwrap_or(0.0)
}

fn awakenings_score(awakenings: u32) -> f64 {
    (100.0 - f64::from(awakenings) * 10.0).max(0.0)
}

fn latency_score(latency_minutes: u32) -> f64 {
    let excess = latency_minutes.saturating_sub(IDEAL_LATENCY_MINUTES);
    (100.0 - f64::from(excess) * 2.0).max(0.0)
}

fn environment_score(tags: &BTreeSet<String>) -> f64 {
    let present: BTreeSet<EnvironmentTag> = tags
        .iter()
        .filter_map(|label| EnvironmentTag::from_label(label))
        .collect();

    let raw: u32 = TAG_BONUSES
        .iter()
        .filter(|(tag, _)| present.contains(tag))
        .map(|(_, bonus)| bonus)
        .sum();

    f64::from(raw) / f64::from(MAX_ENVIRONMENT_BONUS) * 100.0
}

/// Short evaluation comment for a total score
pub fn score_comment(score: u32) -> &'static str {
    match score {
        90.. => "Excellent sleep!",
        80..=89 => "Good sleep.",
        70..=79 => "Decent sleep.",
        60..=69 => "There is room to improve.",
        50..=59 => "Your sleep quality is slipping.",
        _ => "Time to rethink your sleep environment.",
    }
}

/// Display color for a total score
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreColor {
    Green,
    Orange,
    Red,
}

impl ScoreColor {
    pub fn from_score(score: u32) -> Self {
        if score >= 80 {
            ScoreColor::Green
        } else if score >= 60 {
            ScoreColor::Orange
        } else {
            ScoreColor::Red
        }
    }

    pub fn hex(&self) -> &'static str {
        match self {
            ScoreColor::Green => "#22C55E",
            ScoreColor::Orange => "#F59E0B",
            ScoreColor::Red => "#EF4444",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::parse_clock_time;
    use pretty_assertions::assert_eq;

    fn make_input(
        bedtime: &str,
        waketime: &str,
        quality: SleepQuality,
        awakenings: u32,
        latency: u32,
        tags: &[&str],
    ) -> SleepScoreInput {
        SleepScoreInput {
            bedtime: parse_clock_time(bedtime).unwrap(),
            waketime: parse_clock_time(waketime).unwrap(),
            sleep_quality: quality,
            awakenings,
            sleep_latency: latency,
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    #[test]
    fn test_weights_sum_to_one() {
        let pct = SLEEP_TIME_WEIGHT_PCT
            + DEEP_SLEEP_WEIGHT_PCT
            + AWAKENINGS_WEIGHT_PCT
            + LATENCY_WEIGHT_PCT
            + ENVIRONMENT_WEIGHT_PCT;
        assert_eq!(pct, 100);

        let input = make_input("23:00", "06:00", SleepQuality::Average, 1, 20, &[]);
        let result = calculate_sleep_score(&input);
        let sum: f64 = result.breakdown.components().iter().map(|c| c.weight).sum();
        assert!((sum - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_perfect_night_scores_100() {
        let input = make_input(
            "23:00",
            "06:00",
            SleepQuality::WellRested,
            0,
            15,
            &["exercise", "no_caffeine", "bath", "temperature"],
        );
        let result = calculate_sleep_score(&input);

        assert_eq!(result.total_score, 100);
        assert_eq!(result.total_hours, 7.0);
        for c in result.breakdown.components() {
            assert_eq!(c.score, 100.0);
        }
    }

    #[test]
    fn test_poor_night() {
        // 4h, shallow, 6 awakenings, 60 min latency, no tags:
        // 57.14*0.30 + 40*0.25 + 40*0.20 + 10*0.15 + 0 = 36.64
        let input = make_input("23:00", "03:00", SleepQuality::Shallow, 6, 60, &[]);
        let result = calculate_sleep_score(&input);

        assert!((result.breakdown.sleep_time.score - 400.0 / 7.0).abs() < 1e-9);
        assert_eq!(result.breakdown.deep_sleep.score, 40.0);
        assert_eq!(result.breakdown.awakenings.score, 40.0);
        assert_eq!(result.breakdown.latency.score, 10.0);
        assert_eq!(result.breakdown.environment.score, 0.0);
        assert_eq!(result.total_score, 37);
    }

    #[test]
    fn test_ties_round_up() {
        // 30 + 17.5 + 20 + 15 + 0 = 82.5
        let input = make_input("23:00", "06:00", SleepQuality::Average, 0, 15, &[]);
        assert_eq!(calculate_sleep_score(&input).total_score, 83);
    }

    #[test]
    fn test_many_awakenings_floor_at_zero() {
        let input = make_input("23:00", "06:00", SleepQuality::Average, u32::MAX, 0, &[]);
        let result = calculate_sleep_score(&input);
        assert_eq!(result.breakdown.awakenings.score, 0.0);
        assert!(result.total_score <= 100);
    }

    #[test]
    fn test_long_sleep_is_not_over_rewarded() {
        let input = make_input("20:00", "10:00", SleepQuality::Average, 0, 0, &[]);
        let result = calculate_sleep_score(&input);
        assert_eq!(result.total_hours, 14.0);
        assert_eq!(result.breakdown.sleep_time.score, 100.0);
    }

    #[test]
    fn test_zero_hours_scores_zero_sleep_time() {
        let input = make_input("23:00", "23:00", SleepQuality::Average, 0, 0, &[]);
        let result = calculate_sleep_score(&input);
        assert_eq!(result.total_hours, 0.0);
        assert_eq!(result.breakdown.sleep_time.score, 0.0);
    }

    #[test]
    fn test_environment_tags() {
        let input = make_input(
            "23:00",
            "06:00",
            SleepQuality::Average,
            0,
            0,
            &["exercise", "運動", "reading", "bath"],
        );
        let result = calculate_sleep_score(&input);
        // exercise counted once (+5), bath (+3), reading inert: 8/15
        assert!((result.breakdown.environment.score - 800.0 / 15.0).abs() < 1e-9);
    }

    #[test]
    fn test_latency_penalty() {
        assert_eq!(latency_score(0), 100.0);
        assert_eq!(latency_score(15), 100.0);
        assert_eq!(latency_score(30), 70.0);
        assert_eq!(latency_score(65), 0.0);
    }

    #[test]
    fn test_idempotent() {
        let input = make_input("22:15", "06:40", SleepQuality::Shallow, 2, 25, &["bath"]);
        assert_eq!(calculate_sleep_score(&input), calculate_sleep_score(&input));
    }

    #[test]
    fn test_score_comment_and_color() {
        assert_eq!(score_comment(95), "Excellent sleep!");
        assert_eq!(score_comment(60), "There is room to improve.");
        assert_eq!(score_comment(10), "Time to rethink your sleep environment.");
        assert_eq!(ScoreColor::from_score(80), ScoreColor::Green);
        assert_eq!(ScoreColor::from_score(79).hex(), "#F59E0B");
        assert_eq!(ScoreColor::from_score(59), ScoreColor::Red);
    }
}
