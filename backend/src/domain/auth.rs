//! Authentication primitives for the mock login flow.
//!
//! Any non-empty username/password pair is accepted except the sentinel
//! password [`REJECTED_PASSWORD`], which lets scenarios exercise the 401 path.
//! Inbound payload parsing stays in the HTTP adapter; this module only sees
//! validated strings.

use std::fmt;

use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use super::Error;

/// Password that always fails authentication.
pub const REJECTED_PASSWORD: &str = "wrong";

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// Username was missing or blank once trimmed.
    MissingUsername,
    /// Password was missing or empty.
    MissingPassword,
}

impl LoginValidationError {
    /// Field the error refers to.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::MissingUsername => "username",
            Self::MissingPassword => "password",
        }
    }
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingUsername => write!(f, "username is required"),
            Self::MissingPassword => write!(f, "password is required"),
        }
    }
}

impl std::error::Error for LoginValidationError {}

/// Validated login credentials.
///
/// ## Invariants
/// - `username` is trimmed and non-empty.
/// - `password` is non-empty and keeps caller-provided whitespace.
///
/// # Examples
/// ```
/// use mock_api::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(Some(" alice "), Some("pw")).unwrap();
/// assert_eq!(creds.username(), "alice");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw, possibly absent, inputs.
    pub fn try_from_parts(
        username: Option<&str>,
        password: Option<&str>,
    ) -> Result<Self, LoginValidationError> {
        let user = username
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .ok_or(LoginValidationError::MissingUsername)?;
        let secret = password
            .filter(|p| !p.is_empty())
            .ok_or(LoginValidationError::MissingPassword)?;
        Ok(Self {
            username: user.to_owned(),
            password: Zeroizing::new(secret.to_owned()),
        })
    }

    /// Trimmed username.
    #[must_use]
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Password as supplied.
    #[must_use]
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Check credentials against the mock policy.
///
/// # Examples
/// ```
/// use mock_api::domain::{LoginCredentials, authenticate};
///
/// let ok = LoginCredentials::try_from_parts(Some("bob"), Some("secret")).unwrap();
/// assert!(authenticate(&ok).is_ok());
///
/// let bad = LoginCredentials::try_from_parts(Some("bob"), Some("wrong")).unwrap();
/// assert!(authenticate(&bad).is_err());
/// ```
pub fn authenticate(credentials: &LoginCredentials) -> Result<(), Error> {
    if credentials.password() == REJECTED_PASSWORD {
        return Err(Error::unauthorized("invalid credentials"));
    }
    Ok(())
}

/// Claims carried by issued bearer tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Username the token was issued to.
    pub sub: String,
    /// Issue time, seconds since the Unix epoch.
    pub iat: u64,
    /// Expiry time, seconds since the Unix epoch.
    pub exp: u64,
    /// Unique token id.
    pub jti: String,
}

/// A freshly signed token and its lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    /// Compact serialised token.
    pub token: String,
    /// Lifetime in seconds.
    pub expires_in: u64,
}
