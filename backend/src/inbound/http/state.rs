//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` and only depend on
//! domain ports, so they stay testable without real randomness, wall-clock
//! time or signing keys.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use mockable::Clock;

use crate::domain::FaultSettings;
use crate::domain::payload::DEFAULT_MAX_PAYLOAD_ITEMS;
use crate::domain::ports::{Randomness, TokenService};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Source of ids, delays and fault decisions.
    pub randomness: Arc<dyn Randomness>,
    /// Bearer token issuer and verifier.
    pub tokens: Arc<dyn TokenService>,
    /// Timestamp source.
    pub clock: Arc<dyn Clock + Send + Sync>,
    /// Delay cap and failure rate.
    pub faults: FaultSettings,
    /// Cap on `/api/large-payload` sizes.
    pub max_payload_items: usize,
}

impl HttpState {
    /// Construct state with default fault settings and payload cap.
    #[must_use]
    pub fn new(
        randomness: Arc<dyn Randomness>,
        tokens: Arc<dyn TokenService>,
        clock: Arc<dyn Clock + Send + Sync>,
    ) -> Self {
        Self {
            randomness,
            tokens,
            clock,
            faults: FaultSettings::default(),
            max_payload_items: DEFAULT_MAX_PAYLOAD_ITEMS,
        }
    }

    /// Override the fault settings.
    #[must_use]
    pub fn with_faults(mut self, faults: FaultSettings) -> Self {
        self.faults = faults;
        self
    }

    /// Override the payload cap.
    #[must_use]
    pub fn with_max_payload_items(mut self, max: usize) -> Self {
        self.max_payload_items = max;
        self
    }

    /// Current time from the injected clock.
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.utc()
    }
}
