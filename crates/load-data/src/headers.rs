//! Header sets attached to scenario requests.

use crate::error::HeaderError;

/// `Authorization` header name.
pub const AUTHORIZATION: &str = "Authorization";

/// `Content-Type` header name.
pub const CONTENT_TYPE: &str = "Content-Type";

/// Media type sent with every JSON body.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Ordered list of request headers.
///
/// Lookups are case-insensitive to match HTTP semantics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestHeaders {
    entries: Vec<(String, String)>,
}

impl RequestHeaders {
    /// Appends a header, replacing any existing value with the same name.
    #[must_use]
    pub fn with(mut self, name: &str, value: impl Into<String>) -> Self {
        self.entries
            .retain(|(existing, _)| !existing.eq_ignore_ascii_case(name));
        self.entries.push((name.to_owned(), value.into()));
        self
    }

    /// Returns the value for `name`, if present.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Iterates over `(name, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// Number of headers in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Headers for an unauthenticated JSON request.
#[must_use]
pub fn json_headers() -> RequestHeaders {
    RequestHeaders::default().with(CONTENT_TYPE, JSON_CONTENT_TYPE)
}

/// Headers for an authenticated JSON request carrying `Bearer <token>`.
///
/// # Errors
///
/// Returns [`HeaderError::EmptyToken`] for blank tokens and
/// [`HeaderError::InvalidTokenCharacter`] when the token contains whitespace
/// or control characters.
///
/// # Example
///
/// ```
/// use load_data::{HeaderError, auth_headers};
///
/// let headers = auth_headers("token-123").expect("valid token");
/// assert_eq!(headers.get("authorization"), Some("Bearer token-123"));
/// assert_eq!(auth_headers("  "), Err(HeaderError::EmptyToken));
/// ```
pub fn auth_headers(token: &str) -> Result<RequestHeaders, HeaderError> {
    let trimmed = token.trim();
    if trimmed.is_empty() {
        return Err(HeaderError::EmptyToken);
    }
    if let Some((index, _)) = trimmed
        .char_indices()
        .find(|(_, c)| c.is_whitespace() || c.is_control())
    {
        return Err(HeaderError::InvalidTokenCharacter { index });
    }
    Ok(json_headers().with(AUTHORIZATION, format!("Bearer {trimmed}")))
}
