//! Driving port for issuing and verifying bearer tokens.
//!
//! Signing is synchronous and cheap, so the port is a plain trait.

use crate::domain::{Error, IssuedToken, TokenClaims};

/// Issue and verify bearer tokens.
#[cfg_attr(test, mockall::automock)]
pub trait TokenService: Send + Sync {
    /// Sign a token for `username`.
    fn issue(&self, username: &str) -> Result<IssuedToken, Error>;

    /// Check signature and expiry, returning the embedded claims.
    ///
    /// Fails with [`crate::domain::ErrorCode::Unauthorized`] for any token
    /// that is malformed, tampered with or expired.
    fn verify(&self, token: &str) -> Result<TokenClaims, Error>;
}
