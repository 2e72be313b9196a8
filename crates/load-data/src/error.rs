//! Error types for the load-data crate.

use thiserror::Error;

/// Errors raised while building request headers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HeaderError {
    /// The bearer token was empty once trimmed.
    #[error("bearer token must not be empty")]
    EmptyToken,

    /// The bearer token contains characters that cannot appear in a header.
    #[error("bearer token contains invalid character at index {index}")]
    InvalidTokenCharacter {
        /// Byte index of the first offending character.
        index: usize,
    },
}
