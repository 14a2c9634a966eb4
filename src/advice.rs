//! Rule-based advice selection
//!
//! Branches are checked in a fixed order and the first match wins. Several
//! conditions can hold at once for the same night, so the order below is part
//! of the behavior.

use crate::record::SleepRecord;
use crate::types::{Advice, AdviceCategory, AdvicePriority, SleepQuality};

fn advice(text: &str, category: AdviceCategory, priority: AdvicePriority) -> Advice {
    Advice {
        text: text.to_string(),
        category,
        priority,
    }
}

/// Select advice for a night from its total score and stored record.
pub fn generate_advice(score: u32, record: &SleepRecord) -> Advice {
    if score >= 90 {
        return advice(
            "Excellent sleep! Keep up your regular routine. 🌟",
            AdviceCategory::SleepHygiene,
            AdvicePriority::Low,
        );
    }

    if score >= 80 {
        return advice(
            "You are sleeping well. Keep your current rhythm! 😊",
            AdviceCategory::SleepHygiene,
            AdvicePriority::Low,
        );
    }

    if score >= 60 {
        return analyze_record(record);
    }

    advice(
        "Your sleep quality is low. Start by going to bed and waking up at the same time every day.",
        AdviceCategory::SleepHygiene,
        AdvicePriority::High,
    )
}

/// Pinpoint the most specific deficiency in a mid-range night.
///
/// Missing columns never trigger their branch.
fn analyze_record(record: &SleepRecord) -> Advice {
    if record.awakenings.is_some_and(|n| n > 2) {
        return advice(
            "You woke up several times. Check your bedroom temperature and lighting. 🌡️",
            AdviceCategory::SleepHygiene,
            AdvicePriority::High,
        );
    }

    if record.sleep_latency.is_some_and(|m| m > 30) {
        return advice(
            "It took a while to fall asleep. Set aside relaxing time an hour before bed. 🛀",
            AdviceCategory::Breathing,
            AdvicePriority::High,
        );
    }

    if record.total_hours.is_some_and(|h| h < 6.0) {
        return advice(
            "You are short on sleep. Try going to bed 30 minutes earlier. ⏰",
            AdviceCategory::SleepHygiene,
            AdvicePriority::High,
        );
    }

    if record.sleep_quality == Some(SleepQuality::Shallow) {
        return advice(
            "Your sleep was shallow. Light stretching before bed can help. 🧘",
            AdviceCategory::Stretch,
            AdvicePriority::Medium,
        );
    }

    if record.tags.as_ref().map_or(0, Vec::len) < 2 {
        return advice(
            "Set up your sleep environment: exercise, a bath and less caffeine all help.",
            AdviceCategory::SleepHygiene,
            AdvicePriority::Medium,
        );
    }

    advice(
        "A little more to gain. Keep a sleep diary to find your own patterns. 📝",
        AdviceCategory::SleepHygiene,
        AdvicePriority::Medium,
    )
}

const BREATHING_TIPS: &[&str] = &[
    "4-7-8 breathing: inhale for 4 seconds, hold for 7, exhale over 8",
    "Belly breathing: inhale slowly while letting your abdomen rise",
    "Body scan: move your attention from your toes up to your head",
];

const BGM_TIPS: &[&str] = &[
    "Play calm classical music or nature sounds at low volume",
    "Use white noise to mask background sounds",
    "Try 528Hz healing music",
];

const STRETCH_TIPS: &[&str] = &[
    "Neck and shoulders: tilt your head slowly from side to side",
    "Lower back: lie on your back and hug your knees",
    "Full body: tense every muscle, then release all at once",
];

const SLEEP_HYGIENE_TIPS: &[&str] = &[
    "Go to bed and wake up at the same time every day",
    "Stay off phones and computers for an hour before bed",
    "Avoid caffeine after 3 PM",
    "Keep the bedroom dark, quiet and between 18 and 22°C",
];

/// Detailed tips for an advice category
pub fn detailed_advice(category: AdviceCategory) -> &'static [&'static str] {
    match category {
        AdviceCategory::Breathing => BREATHING_TIPS,
        AdviceCategory::Bgm => BGM_TIPS,
        AdviceCategory::Stretch => STRETCH_TIPS,
        AdviceCategory::SleepHygiene => SLEEP_HYGIENE_TIPS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::parse_date;
    use crate::time::parse_clock_time;
    use pretty_assertions::assert_eq;

    fn make_record() -> SleepRecord {
        SleepRecord {
            date: parse_date("2025-10-30").unwrap(),
            bedtime: parse_clock_time("23:00").unwrap(),
            waketime: parse_clock_time("07:00").unwrap(),
            total_hours: Some(8.0),
            score: Some(70),
            sleep_quality: Some(SleepQuality::Average),
            awakenings: Some(0),
            sleep_latency: Some(10),
            tags: Some(vec!["bath".to_string(), "exercise".to_string()]),
            dream: None,
            mood: None,
        }
    }

    #[test]
    fn test_high_scores_get_reinforcement() {
        let record = make_record();
        for score in [80, 89, 90, 100] {
            let a = generate_advice(score, &record);
            assert_eq!(a.priority, AdvicePriority::Low);
            assert_eq!(a.category, AdviceCategory::SleepHygiene);
        }
        assert_ne!(
            generate_advice(90, &record).text,
            generate_advice(89, &record).text
        );
    }

    #[test]
    fn test_low_score_gets_fundamentals() {
        let mut record = make_record();
        record.awakenings = Some(5);
        let a = generate_advice(59, &record);
        assert_eq!(a.priority, AdvicePriority::High);
        assert!(a.text.contains("same time"));
    }

    #[test]
    fn test_awakenings_checked_before_latency() {
        let mut record = make_record();
        record.awakenings = Some(3);
        record.sleep_latency = Some(40);

        let a = generate_advice(70, &record);
        assert_eq!(a.category, AdviceCategory::SleepHygiene);
        assert_eq!(a.priority, AdvicePriority::High);
        assert!(a.text.contains("temperature"));
    }

    #[test]
    fn test_latency_branch() {
        let mut record = make_record();
        record.sleep_latency = Some(31);
        record.total_hours = Some(5.0);
        let a = generate_advice(65, &record);
        assert_eq!(a.category, AdviceCategory::Breathing);
        assert_eq!(a.priority, AdvicePriority::High);
    }

    #[test]
    fn test_short_sleep_branch() {
        let mut record = make_record();
        record.total_hours = Some(5.5);
        record.sleep_quality = Some(SleepQuality::Shallow);
        let a = generate_advice(65, &record);
        assert!(a.text.contains("30 minutes earlier"));
    }

    #[test]
    fn test_shallow_branch() {
        let mut record = make_record();
        record.sleep_quality = Some(SleepQuality::Shallow);
        record.tags = None;
        let a = generate_advice(65, &record);
        assert_eq!(a.category, AdviceCategory::Stretch);
        assert_eq!(a.priority, AdvicePriority::Medium);
    }

    #[test]
    fn test_few_tags_branch() {
        let mut record = make_record();
        record.tags = Some(vec!["bath".to_string()]);
        let a = generate_advice(65, &record);
        assert!(a.text.contains("environment"));
        assert_eq!(a.priority, AdvicePriority::Medium);
    }

    #[test]
    fn test_diary_fallback() {
        let a = generate_advice(75, &make_record());
        assert!(a.text.contains("diary"));
        assert_eq!(a.priority, AdvicePriority::Medium);
    }

    #[test]
    fn test_missing_columns_do_not_trigger() {
        let mut record = make_record();
        record.awakenings = None;
        record.sleep_latency = None;
        record.total_hours = None;
        record.sleep_quality = None;
        record.tags = None;
        let a = generate_advice(70, &record);
        assert!(a.text.contains("environment"));
    }

    #[test]
    fn test_detailed_tips() {
        assert_eq!(detailed_advice(AdviceCategory::Breathing).len(), 3);
        assert_eq!(detailed_advice(AdviceCategory::SleepHygiene).len(), 4);
    }
}
