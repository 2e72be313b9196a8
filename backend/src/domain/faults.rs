//! Fault-injection policy: artificial latency and random failures.
//!
//! Handlers draw random numbers through the `Randomness` port and ask this
//! module how to turn them into behaviour, so the policy itself stays pure.

use std::ops::Range;
use std::time::Duration;

use thiserror::Error;

/// Range, in milliseconds, drawn from by `/api/random-delay`.
pub const RANDOM_DELAY_MS: Range<u64> = 100..2000;

/// Default cap applied to `/api/delay/{ms}`.
pub const DEFAULT_MAX_DELAY_MS: u64 = 10_000;

/// Default failure probability for `/api/random-error`.
pub const DEFAULT_ERROR_RATE: f64 = 0.2;

/// Errors raised when fault settings are out of range.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FaultSettingsError {
    /// The error rate was not a probability.
    #[error("error rate must be within [0, 1], got {0}")]
    ErrorRateOutOfRange(f64),
}

/// Validated fault-injection settings.
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use mock_api::domain::FaultSettings;
///
/// let faults = FaultSettings::new(0.5, Duration::from_millis(250)).unwrap();
/// assert_eq!(faults.clamp_delay(1_000), Duration::from_millis(250));
/// assert!(FaultSettings::new(1.5, Duration::ZERO).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaultSettings {
    error_rate: f64,
    max_delay: Duration,
}

impl FaultSettings {
    /// Validate and build settings.
    pub fn new(error_rate: f64, max_delay: Duration) -> Result<Self, FaultSettingsError> {
        if !(0.0..=1.0).contains(&error_rate) {
            return Err(FaultSettingsError::ErrorRateOutOfRange(error_rate));
        }
        Ok(Self {
            error_rate,
            max_delay,
        })
    }

    /// Probability that `/api/random-error` fails.
    #[must_use]
    pub const fn error_rate(&self) -> f64 {
        self.error_rate
    }

    /// Upper bound on requested delays.
    #[must_use]
    pub const fn max_delay(&self) -> Duration {
        self.max_delay
    }

    /// Delay actually applied for a request of `requested_ms`.
    #[must_use]
    pub fn clamp_delay(&self, requested_ms: u64) -> Duration {
        Duration::from_millis(requested_ms).min(self.max_delay)
    }
}

impl Default for FaultSettings {
    fn default() -> Self {
        Self {
            error_rate: DEFAULT_ERROR_RATE,
            max_delay: Duration::from_millis(DEFAULT_MAX_DELAY_MS),
        }
    }
}

/// Whether a requested status code can be echoed.
#[must_use]
pub fn is_echoable_status(code: u16) -> bool {
    (200..=599).contains(&code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0.0)]
    #[case(0.2)]
    #[case(1.0)]
    fn accepts_probabilities(#[case] rate: f64) {
        assert!(FaultSettings::new(rate, Duration::ZERO).is_ok());
    }

    #[rstest]
    #[case(-0.1)]
    #[case(1.01)]
    #[case(f64::NAN)]
    fn rejects_rates_outside_unit_interval(#[case] rate: f64) {
        assert!(FaultSettings::new(rate, Duration::ZERO).is_err());
    }

    #[rstest]
    #[case(0, 0)]
    #[case(500, 500)]
    #[case(10_000, 10_000)]
    #[case(60_000, 10_000)]
    fn clamp_delay_caps_at_maximum(#[case] requested: u64, #[case] expected: u64) {
        let faults = FaultSettings::default();
        assert_eq!(
            faults.clamp_delay(requested),
            Duration::from_millis(expected)
        );
    }

    #[rstest]
    #[case(199, false)]
    #[case(200, true)]
    #[case(404, true)]
    #[case(599, true)]
    #[case(600, false)]
    fn echoable_statuses(#[case] code: u16, #[case] expected: bool) {
        assert_eq!(is_echoable_status(code), expected);
    }
}
