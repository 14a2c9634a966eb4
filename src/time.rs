//! Clock time arithmetic
//!
//! Bedtime and waketime are stored as wall-clock times without a date. A night
//! that crosses midnight is detected by the waketime being earlier than the
//! bedtime.

use chrono::{NaiveTime, Timelike};

use crate::error::SleepinError;

const MINUTES_PER_DAY: u32 = 24 * 60;

/// Parse an `HH:MM` clock string.
pub fn parse_clock_time(value: &str) -> Result<NaiveTime, SleepinError> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M")
        .map_err(|_| SleepinError::InvalidTime(value.to_string()))
}

/// Format a clock time as `HH:MM`.
pub fn format_clock_time(time: &NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

/// Hours elapsed between bedtime and waketime.
///
/// A waketime earlier than the bedtime is taken to be on the following day.
/// Equal times yield zero hours. Seconds are ignored.
pub fn elapsed_hours(bedtime: NaiveTime, waketime: NaiveTime) -> f64 {
    let bed = minute_of_day(bedtime);
    let mut wake = minute_of_day(waketime);

    if wake < bed {
        wake += MINUTES_PER_DAY;
    }

    f64::from(wake - bed) / 60.0
}

fn minute_of_day(time: NaiveTime) -> u32 {
    time.hour() * 60 + time.minute()
}

/// Serde adapter storing a `NaiveTime` as `HH:MM`.
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::format_clock_time(time))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        super::parse_clock_time(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(value: &str) -> NaiveTime {
        parse_clock_time(value).unwrap()
    }

    #[test]
    fn test_overnight_wraparound() {
        assert_eq!(elapsed_hours(t("22:30"), t("07:00")), 8.5);
    }

    #[test]
    fn test_same_day_span() {
        assert_eq!(elapsed_hours(t("07:00"), t("22:30")), 15.5);
    }

    #[test]
    fn test_equal_times_yield_zero() {
        assert_eq!(elapsed_hours(t("23:00"), t("23:00")), 0.0);
    }

    #[test]
    fn test_one_minute_before_bedtime_wraps() {
        let hours = elapsed_hours(t("23:00"), t("22:59"));
        assert!((hours - (23.0 + 59.0 / 60.0)).abs() < 1e-9);
    }

    #[test]
    fn test_seconds_are_ignored() {
        let bed = NaiveTime::from_hms_opt(22, 0, 45).unwrap();
        let wake = NaiveTime::from_hms_opt(6, 0, 10).unwrap();
        assert_eq!(elapsed_hours(bed, wake), 8.0);
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(matches!(
            parse_clock_time("25:00"),
            Err(SleepinError::InvalidTime(_))
        ));
        assert!(matches!(
            parse_clock_time("late"),
            Err(SleepinError::InvalidTime(_))
        ));
    }

    #[test]
    fn test_format_round_trips_hhmm() {
        assert_eq!(format_clock_time(&t("07:05")), "07:05");
    }
}
