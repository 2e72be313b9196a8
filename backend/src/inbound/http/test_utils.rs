//! Test helpers for inbound HTTP components.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local, Utc};
use mockable::Clock;

use super::state::HttpState;
use crate::domain::ports::FixedRandomness;
use crate::outbound::JwtTokenService;

/// Timestamp reported by [`FixedClock`], as serialised in responses.
pub const FIXED_NOW: &str = "2026-01-02T03:04:05Z";

/// Secret used by [`fixture_state`] when signing tokens.
pub const TEST_SECRET: &[u8] = b"test-secret";

/// Clock frozen at [`FIXED_NOW`].
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Default for FixedClock {
    fn default() -> Self {
        Self(
            DateTime::parse_from_rfc3339(FIXED_NOW)
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or_default(),
        )
    }
}

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

/// State with deterministic randomness that never injects faults.
#[must_use]
pub fn fixture_state() -> HttpState {
    state_with(FixedRandomness::default())
}

/// State with deterministic randomness whose fault checks always fire.
#[must_use]
pub fn failing_state() -> HttpState {
    state_with(FixedRandomness::failing())
}

fn state_with(randomness: FixedRandomness) -> HttpState {
    HttpState::new(
        Arc::new(randomness),
        Arc::new(JwtTokenService::new(TEST_SECRET, Duration::from_secs(3_600))),
        Arc::new(FixedClock::default()),
    )
}
