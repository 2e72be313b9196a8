//! Engine duration strings: `500ms`, `30s`, `5m`, `1h30m`, `2d`.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::DurationParseError;

const MS_PER_SECOND: u64 = 1_000;
const MS_PER_MINUTE: u64 = 60 * MS_PER_SECOND;
const MS_PER_HOUR: u64 = 60 * MS_PER_MINUTE;
const MS_PER_DAY: u64 = 24 * MS_PER_HOUR;

/// A duration with millisecond precision, printed in engine notation.
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use scenarios::EngineDuration;
///
/// let d: EngineDuration = "1h30m".parse().unwrap();
/// assert_eq!(d.as_duration(), Duration::from_secs(5_400));
/// assert_eq!(d.to_string(), "1h30m");
/// assert_eq!(EngineDuration::from_millis(1_500).to_string(), "1s500ms");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct EngineDuration(u64);

impl EngineDuration {
    /// From milliseconds.
    #[must_use]
    pub const fn from_millis(ms: u64) -> Self {
        Self(ms)
    }

    /// From seconds.
    #[must_use]
    pub const fn from_secs(secs: u64) -> Self {
        Self(secs.saturating_mul(MS_PER_SECOND))
    }

    /// From minutes.
    #[must_use]
    pub const fn from_mins(mins: u64) -> Self {
        Self(mins.saturating_mul(MS_PER_MINUTE))
    }

    /// From hours.
    #[must_use]
    pub const fn from_hours(hours: u64) -> Self {
        Self(hours.saturating_mul(MS_PER_HOUR))
    }

    /// Total milliseconds.
    #[must_use]
    pub const fn as_millis(self) -> u64 {
        self.0
    }

    /// As a standard duration.
    #[must_use]
    pub const fn as_duration(self) -> Duration {
        Duration::from_millis(self.0)
    }

    /// Sum of two durations, saturating.
    #[must_use]
    pub const fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }
}

fn unit_millis(unit: &str) -> Option<u64> {
    match unit {
        "ms" => Some(1),
        "s" => Some(MS_PER_SECOND),
        "m" => Some(MS_PER_MINUTE),
        "h" => Some(MS_PER_HOUR),
        "d" => Some(MS_PER_DAY),
        _ => None,
    }
}

impl FromStr for EngineDuration {
    type Err = DurationParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim();
        if input.is_empty() {
            return Err(DurationParseError::Empty);
        }
        let mut total: u64 = 0;
        let mut chars = input.chars().peekable();
        while chars.peek().is_some() {
            let mut number = String::new();
            while let Some(c) = chars.next_if(char::is_ascii_digit) {
                number.push(c);
            }
            let mut unit = String::new();
            while let Some(c) = chars.next_if(|ch| !ch.is_ascii_digit()) {
                unit.push(c);
            }
            if number.is_empty() {
                return Err(DurationParseError::MissingNumber {
                    input: input.to_owned(),
                });
            }
            if unit.is_empty() {
                return Err(DurationParseError::MissingUnit {
                    input: input.to_owned(),
                });
            }
            let factor = unit_millis(&unit).ok_or_else(|| DurationParseError::UnknownUnit {
                input: input.to_owned(),
                unit: unit.clone(),
            })?;
            let overflow = || DurationParseError::Overflow {
                input: input.to_owned(),
            };
            let value: u64 = number.parse().map_err(|_| overflow())?;
            total = value
                .checked_mul(factor)
                .and_then(|part| total.checked_add(part))
                .ok_or_else(overflow)?;
        }
        Ok(Self(total))
    }
}

impl fmt::Display for EngineDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == 0 {
            return f.write_str("0s");
        }
        let mut rest = self.0;
        for (factor, unit) in [
            (MS_PER_HOUR, "h"),
            (MS_PER_MINUTE, "m"),
            (MS_PER_SECOND, "s"),
            (1, "ms"),
        ] {
            let count = rest.div_euclid(factor);
            rest = rest.rem_euclid(factor);
            if count > 0 {
                write!(f, "{count}{unit}")?;
            }
        }
        Ok(())
    }
}

impl From<EngineDuration> for Duration {
    fn from(value: EngineDuration) -> Self {
        value.as_duration()
    }
}

impl Serialize for EngineDuration {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for EngineDuration {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("500ms", 500)]
    #[case("30s", 30_000)]
    #[case("5m", 300_000)]
    #[case("1h30m", 5_400_000)]
    #[case("1m30s", 90_000)]
    #[case("2d", 172_800_000)]
    #[case(" 10s ", 10_000)]
    #[case("0s", 0)]
    fn parses_engine_notation(#[case] raw: &str, #[case] millis: u64) {
        let parsed: EngineDuration = raw.parse().expect("valid duration");
        assert_eq!(parsed.as_millis(), millis);
    }

    #[rstest]
    #[case("", DurationParseError::Empty)]
    #[case("30", DurationParseError::MissingUnit { input: "30".to_owned() })]
    #[case("s", DurationParseError::MissingNumber { input: "s".to_owned() })]
    #[case("5x", DurationParseError::UnknownUnit { input: "5x".to_owned(), unit: "x".to_owned() })]
    #[case("1.5s", DurationParseError::UnknownUnit { input: "1.5s".to_owned(), unit: ".".to_owned() })]
    fn rejects_malformed_input(#[case] raw: &str, #[case] expected: DurationParseError) {
        assert_eq!(raw.parse::<EngineDuration>(), Err(expected));
    }

    #[rstest]
    #[case(EngineDuration::from_millis(250), "250ms")]
    #[case(EngineDuration::from_secs(90), "1m30s")]
    #[case(EngineDuration::from_hours(3).saturating_add(EngineDuration::from_mins(56)), "3h56m")]
    #[case(EngineDuration::from_mins(0), "0s")]
    fn prints_canonically(#[case] duration: EngineDuration, #[case] expected: &str) {
        assert_eq!(duration.to_string(), expected);
    }

    #[test]
    fn serialises_as_string() {
        let json = serde_json::to_value(EngineDuration::from_secs(30)).expect("serialise");
        assert_eq!(json, serde_json::json!("30s"));
        let back: EngineDuration = serde_json::from_value(json).expect("deserialise");
        assert_eq!(back, EngineDuration::from_secs(30));
    }
}
