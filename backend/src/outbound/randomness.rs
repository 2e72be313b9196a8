//! `Randomness` adapter backed by the thread-local RNG.

use std::ops::Range;

use rand::Rng;
use uuid::Uuid;

use crate::domain::ports::Randomness;

/// Draws from `rand::rng()` on every call.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandomness;

impl Randomness for ThreadRandomness {
    fn in_range(&self, range: Range<u64>) -> u64 {
        if range.is_empty() {
            return range.start;
        }
        rand::rng().random_range(range)
    }

    fn chance(&self, probability: f64) -> bool {
        if !probability.is_finite() {
            return false;
        }
        rand::rng().random_bool(probability.clamp(0.0, 1.0))
    }

    fn alphanumeric(&self, len: usize) -> String {
        load_data::random_string(&mut rand::rng(), len)
    }

    fn uuid(&self) -> Uuid {
        Uuid::new_v4()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn in_range_stays_within_bounds() {
        let rng = ThreadRandomness;
        for _ in 0..1_000 {
            let value = rng.in_range(100..2_000);
            assert!((100..2_000).contains(&value));
        }
    }

    #[test]
    fn empty_range_returns_start() {
        assert_eq!(ThreadRandomness.in_range(5..5), 5);
    }

    #[rstest]
    #[case(0.0, false)]
    #[case(-1.0, false)]
    #[case(f64::NAN, false)]
    #[case(1.0, true)]
    #[case(2.0, true)]
    fn chance_handles_degenerate_probabilities(#[case] probability: f64, #[case] expected: bool) {
        assert_eq!(ThreadRandomness.chance(probability), expected);
    }

    #[test]
    fn alphanumeric_has_requested_length() {
        let value = ThreadRandomness.alphanumeric(16);
        assert_eq!(value.len(), 16);
        assert!(value.chars().all(|c| c.is_ascii_alphanumeric()));
    }
}
