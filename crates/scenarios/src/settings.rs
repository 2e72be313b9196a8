//! Run settings taken from the environment.
//!
//! Scenario scripts read `BASE_URL`, `VUS`, `DURATION`, `ENVIRONMENT` and
//! `TIMEOUT` unprefixed so the same variables drive both the engine and
//! these helpers.

use std::fmt;
use std::str::FromStr;

use mockable::Env;
use url::Url;

use crate::duration::EngineDuration;
use crate::error::SettingsError;

/// Target server.
pub const BASE_URL_ENV: &str = "BASE_URL";
/// Virtual-user override.
pub const VUS_ENV: &str = "VUS";
/// Duration override.
pub const DURATION_ENV: &str = "DURATION";
/// Deployment label added to metric tags.
pub const ENVIRONMENT_ENV: &str = "ENVIRONMENT";
/// Per-request timeout.
pub const TIMEOUT_ENV: &str = "TIMEOUT";

/// Server the scenarios target when `BASE_URL` is unset.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";
/// VUs for constant-VU scenarios when `VUS` is unset.
pub const DEFAULT_VUS: u32 = 10;
/// Run time for constant-VU scenarios when `DURATION` is unset.
pub const DEFAULT_DURATION: EngineDuration = EngineDuration::from_secs(30);
/// Request timeout when `TIMEOUT` is unset.
pub const DEFAULT_TIMEOUT: EngineDuration = EngineDuration::from_secs(30);

/// Deployment the run targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    /// Developer machine.
    #[default]
    Local,
    /// Shared pre-production.
    Staging,
    /// Live.
    Production,
}

impl Environment {
    /// Tag value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Staging => "staging",
            Self::Production => "production",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "staging" => Ok(Self::Staging),
            "production" => Ok(Self::Production),
            _ => Err(()),
        }
    }
}

/// Resolved run settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSettings {
    /// Target server.
    pub base_url: Url,
    /// Explicit `VUS` override.
    pub vus: Option<u32>,
    /// Explicit `DURATION` override.
    pub duration: Option<EngineDuration>,
    /// Deployment label.
    pub environment: Environment,
    /// Per-request timeout.
    pub timeout: EngineDuration,
}

fn default_base_url() -> Result<Url, SettingsError> {
    Url::parse(DEFAULT_BASE_URL).map_err(|_| SettingsError::InvalidEnv {
        name: BASE_URL_ENV,
        value: DEFAULT_BASE_URL.to_owned(),
        expected: "an absolute http(s) URL",
    })
}

impl RunSettings {
    /// Read settings from `env`, treating blank variables as unset.
    ///
    /// # Errors
    ///
    /// [`SettingsError::InvalidEnv`] when a variable is present but does not
    /// parse.
    ///
    /// # Examples
    /// ```
    /// use mockable::MockEnv;
    /// use scenarios::RunSettings;
    ///
    /// let mut env = MockEnv::new();
    /// env.expect_string().returning(|key| match key {
    ///     "VUS" => Some("25".to_owned()),
    ///     _ => None,
    /// });
    /// let settings = RunSettings::from_env(&env).unwrap();
    /// assert_eq!(settings.effective_vus(), 25);
    /// ```
    pub fn from_env<E: Env>(env: &E) -> Result<Self, SettingsError> {
        let configured_url = read(env, BASE_URL_ENV, "an absolute http(s) URL", |raw| {
            Url::parse(raw)
                .ok()
                .filter(|url| matches!(url.scheme(), "http" | "https"))
        })?;
        let base_url = match configured_url {
            Some(url) => url,
            None => default_base_url()?,
        };
        let vus = read(env, VUS_ENV, "a positive integer", |raw| {
            raw.parse::<u32>().ok().filter(|vus| *vus > 0)
        })?;
        let duration = read(env, DURATION_ENV, "a non-zero duration such as 30s or 1h30m", |raw| {
            raw.parse::<EngineDuration>()
                .ok()
                .filter(|d| d.as_millis() > 0)
        })?;
        let environment = read(env, ENVIRONMENT_ENV, "local, staging or production", |raw| {
            raw.parse().ok()
        })?
        .unwrap_or_default();
        let timeout = read(env, TIMEOUT_ENV, "a non-zero duration such as 30s", |raw| {
            raw.parse::<EngineDuration>()
                .ok()
                .filter(|d| d.as_millis() > 0)
        })?
        .unwrap_or(DEFAULT_TIMEOUT);
        Ok(Self {
            base_url,
            vus,
            duration,
            environment,
            timeout,
        })
    }

    /// VUs for constant-VU scenarios.
    #[must_use]
    pub fn effective_vus(&self) -> u32 {
        self.vus.unwrap_or(DEFAULT_VUS)
    }

    /// Run time for constant-VU scenarios.
    #[must_use]
    pub fn effective_duration(&self) -> EngineDuration {
        self.duration.unwrap_or(DEFAULT_DURATION)
    }

    /// Resolve `path` against the base URL, keeping any base path prefix.
    #[must_use]
    pub fn url_for(&self, path: &str) -> String {
        let base = self.base_url.as_str().trim_end_matches('/');
        let suffix = path.trim_start_matches('/');
        format!("{base}/{suffix}")
    }
}

fn read<E, T, F>(
    env: &E,
    name: &'static str,
    expected: &'static str,
    parse: F,
) -> Result<Option<T>, SettingsError>
where
    E: Env,
    F: FnOnce(&str) -> Option<T>,
{
    let Some(raw) = env.string(name) else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    parse(trimmed)
        .map(Some)
        .ok_or_else(|| SettingsError::InvalidEnv {
            name,
            value: raw.clone(),
            expected,
        })
}
