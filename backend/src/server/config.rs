//! Server settings loaded via OrthoConfig.
//!
//! Values come from CLI flags, `MOCK_API_*` environment variables or a config
//! file; every field is optional and falls back to a documented default.

use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;

use crate::domain::faults::{DEFAULT_ERROR_RATE, DEFAULT_MAX_DELAY_MS};
use crate::domain::payload::DEFAULT_MAX_PAYLOAD_ITEMS;
use crate::domain::{FaultSettings, FaultSettingsError};

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_TOKEN_TTL_SECS: u64 = 3_600;

/// Signing secret used when none is configured. Only suitable for local runs.
pub const DEVELOPMENT_JWT_SECRET: &str = "mock-api-development-secret";

/// Errors raised while turning settings into runtime state.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Fault settings were out of range.
    #[error(transparent)]
    Faults(#[from] FaultSettingsError),
    /// The signing secret was configured but blank.
    #[error("jwt secret must not be blank")]
    BlankSecret,
}

/// Mock API server settings.
#[derive(Debug, Clone, Default, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "MOCK_API")]
pub struct ServerSettings {
    /// Interface to bind.
    pub host: Option<String>,
    /// Port to bind.
    pub port: Option<u16>,
    /// HS256 signing secret for issued tokens.
    pub jwt_secret: Option<String>,
    /// Lifetime of issued tokens in seconds.
    pub token_ttl_secs: Option<u64>,
    /// Cap on `/api/delay/{ms}` in milliseconds.
    pub max_delay_ms: Option<u64>,
    /// Failure probability for `/api/random-error`.
    pub error_rate: Option<f64>,
    /// Cap on `/api/large-payload` sizes.
    pub max_payload_items: Option<usize>,
}

impl ServerSettings {
    /// Host and port to bind.
    #[must_use]
    pub fn bind_addr(&self) -> (&str, u16) {
        (
            self.host.as_deref().unwrap_or(DEFAULT_HOST),
            self.port.unwrap_or(DEFAULT_PORT),
        )
    }

    /// Whether the development secret is in use.
    #[must_use]
    pub const fn uses_development_secret(&self) -> bool {
        self.jwt_secret.is_none()
    }

    /// Signing secret, falling back to [`DEVELOPMENT_JWT_SECRET`].
    pub fn jwt_secret(&self) -> Result<&[u8], SettingsError> {
        match self.jwt_secret.as_deref() {
            None => Ok(DEVELOPMENT_JWT_SECRET.as_bytes()),
            Some(secret) if secret.trim().is_empty() => Err(SettingsError::BlankSecret),
            Some(secret) => Ok(secret.as_bytes()),
        }
    }

    /// Token lifetime.
    #[must_use]
    pub fn token_ttl(&self) -> Duration {
        Duration::from_secs(self.token_ttl_secs.unwrap_or(DEFAULT_TOKEN_TTL_SECS))
    }

    /// Validated fault-injection settings.
    pub fn faults(&self) -> Result<FaultSettings, SettingsError> {
        Ok(FaultSettings::new(
            self.error_rate.unwrap_or(DEFAULT_ERROR_RATE),
            Duration::from_millis(self.max_delay_ms.unwrap_or(DEFAULT_MAX_DELAY_MS)),
        )?)
    }

    /// Cap on synthetic payload sizes.
    #[must_use]
    pub fn max_payload_items(&self) -> usize {
        self.max_payload_items.unwrap_or(DEFAULT_MAX_PAYLOAD_ITEMS)
    }
}
