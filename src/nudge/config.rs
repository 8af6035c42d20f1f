//! Nudge configuration and input validation

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Longest countdown accepted, one week
pub const MAX_MINUTES: u64 = 7 * 24 * 60;

/// How nudges are laid out over a countdown. Exactly one mode is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum NudgeConfig {
    /// `n` nudges spread evenly inside the countdown
    Count(u32),
    /// One nudge at the given percentage of the countdown
    Percent(u8),
}

impl Default for NudgeConfig {
    fn default() -> Self {
        NudgeConfig::Count(3)
    }
}

impl NudgeConfig {
    /// Build a count config from raw input.
    ///
    /// Counts above the countdown length in seconds are capped to it. Past
    /// that point every whole second before the end is already an offset, so
    /// the capped count lays out the same deduplicated set.
    pub fn count(value: i64, duration_seconds: u64) -> Result<Self, ValidationError> {
        if value < 1 {
            return Err(ValidationError::NudgeCountTooLow(value));
        }
        // duration_seconds is bounded by MAX_MINUTES, well inside u32
        let capped = (value as u64).min(duration_seconds);
        Ok(NudgeConfig::Count(capped as u32))
    }

    /// Build a percentage config from raw input
    pub fn percent(value: i64) -> Result<Self, ValidationError> {
        if !(0..=100).contains(&value) {
            return Err(ValidationError::PercentOutOfRange(value));
        }
        Ok(NudgeConfig::Percent(value as u8))
    }
}

/// Check a requested duration in minutes and convert it to seconds
pub fn duration_seconds(minutes: i64) -> Result<u64, ValidationError> {
    if minutes < 1 {
        return Err(ValidationError::DurationTooShort(minutes));
    }
    if minutes as u64 > MAX_MINUTES {
        return Err(ValidationError::DurationTooLong {
            minutes,
            max: MAX_MINUTES,
        });
    }
    Ok(minutes as u64 * 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_rejects_zero_and_negative() {
        assert_eq!(duration_seconds(0), Err(ValidationError::DurationTooShort(0)));
        assert_eq!(duration_seconds(-5), Err(ValidationError::DurationTooShort(-5)));
        assert_eq!(duration_seconds(10), Ok(600));
    }

    #[test]
    fn duration_has_upper_bound() {
        assert!(duration_seconds(MAX_MINUTES as i64).is_ok());
        assert!(matches!(
            duration_seconds(MAX_MINUTES as i64 + 1),
            Err(ValidationError::DurationTooLong { .. })
        ));
    }

    #[test]
    fn count_bounds() {
        assert_eq!(NudgeConfig::count(3, 600), Ok(NudgeConfig::Count(3)));
        assert_eq!(NudgeConfig::count(0, 600), Err(ValidationError::NudgeCountTooLow(0)));
    }

    #[test]
    fn oversized_count_is_capped_to_whole_seconds() {
        assert_eq!(NudgeConfig::count(601, 600), Ok(NudgeConfig::Count(600)));
        assert_eq!(NudgeConfig::count(i64::MAX, 60), Ok(NudgeConfig::Count(60)));

        let capped = crate::nudge::compute_triggers(5, NudgeConfig::count(20, 5).unwrap());
        let uncapped = crate::nudge::compute_triggers(5, NudgeConfig::Count(20));
        assert_eq!(capped, uncapped);
        assert_eq!(capped.offsets(), &[0, 1, 2, 3, 4]);
    }

    #[test]
    fn percent_bounds() {
        assert_eq!(NudgeConfig::percent(0), Ok(NudgeConfig::Percent(0)));
        assert_eq!(NudgeConfig::percent(100), Ok(NudgeConfig::Percent(100)));
        assert_eq!(NudgeConfig::percent(101), Err(ValidationError::PercentOutOfRange(101)));
        assert_eq!(NudgeConfig::percent(-1), Err(ValidationError::PercentOutOfRange(-1)));
    }

    #[test]
    fn serializes_as_tagged_value() {
        let json = serde_json::to_value(NudgeConfig::Percent(50)).unwrap();
        assert_eq!(json, serde_json::json!({"type": "percent", "value": 50}));

        let parsed: NudgeConfig = serde_json::from_str(r#"{"type":"count","value":4}"#).unwrap();
        assert_eq!(parsed, NudgeConfig::Count(4));
    }
}
