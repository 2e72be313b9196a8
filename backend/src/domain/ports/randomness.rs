//! Driven port supplying random values.

use std::ops::Range;

use uuid::Uuid;

/// Source of randomness for ids, delays, fault injection and payloads.
pub trait Randomness: Send + Sync {
    /// Uniform integer in `range`. Returns `range.start` when the range is
    /// empty.
    fn in_range(&self, range: Range<u64>) -> u64;

    /// `true` with probability `probability`.
    fn chance(&self, probability: f64) -> bool;

    /// Alphanumeric string of exactly `len` characters.
    fn alphanumeric(&self, len: usize) -> String;

    /// Random identifier.
    fn uuid(&self) -> Uuid;
}

/// Deterministic double: every draw returns the same predictable value.
///
/// # Examples
/// ```
/// use mock_api::domain::ports::{FixedRandomness, Randomness};
///
/// let fixed = FixedRandomness::failing();
/// assert!(fixed.chance(0.2));
/// assert_eq!(fixed.in_range(5..10), 5);
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct FixedRandomness {
    fire: bool,
}

impl FixedRandomness {
    /// Double whose [`Randomness::chance`] always fires.
    #[must_use]
    pub const fn failing() -> Self {
        Self { fire: true }
    }
}

impl Randomness for FixedRandomness {
    fn in_range(&self, range: Range<u64>) -> u64 {
        range.start
    }

    fn chance(&self, _probability: f64) -> bool {
        self.fire
    }

    fn alphanumeric(&self, len: usize) -> String {
        "a".repeat(len)
    }

    fn uuid(&self) -> Uuid {
        Uuid::nil()
    }
}
