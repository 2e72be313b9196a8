//! HS256 bearer tokens via `jsonwebtoken`.

use std::fmt;
use std::time::Duration;

use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode,
    get_current_timestamp,
};
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::TokenService;
use crate::domain::{Error, IssuedToken, TokenClaims};

/// Signs and verifies tokens with a shared secret.
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use mock_api::domain::ports::TokenService;
/// use mock_api::outbound::JwtTokenService;
///
/// let tokens = JwtTokenService::new(b"secret", Duration::from_secs(60));
/// let issued = tokens.issue("alice").unwrap();
/// assert_eq!(tokens.verify(&issued.token).unwrap().sub, "alice");
/// ```
#[derive(Clone)]
pub struct JwtTokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl JwtTokenService {
    /// Build a service signing with `secret` and issuing tokens valid for
    /// `ttl`.
    #[must_use]
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            ttl,
        }
    }
}

impl fmt::Debug for JwtTokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtTokenService")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl TokenService for JwtTokenService {
    fn issue(&self, username: &str) -> Result<IssuedToken, Error> {
        let issued_at = get_current_timestamp();
        let expires_in = self.ttl.as_secs();
        let claims = TokenClaims {
            sub: username.to_owned(),
            iat: issued_at,
            exp: issued_at.saturating_add(expires_in),
            jti: Uuid::new_v4().to_string(),
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|err| Error::internal(format!("failed to sign token: {err}")))?;
        Ok(IssuedToken { token, expires_in })
    }

    fn verify(&self, token: &str) -> Result<TokenClaims, Error> {
        decode::<TokenClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|err| {
                debug!(error = %err, "rejected bearer token");
                Error::unauthorized("invalid token")
            })
    }
}
