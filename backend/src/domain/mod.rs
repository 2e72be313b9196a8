//! Domain primitives for the mock API.
//!
//! Purpose: hold the transport-agnostic rules behind each endpoint (input
//! validation, fault policy, synthetic payload shapes) so HTTP handlers only
//! map requests and responses.
//!
//! Public surface:
//! - Error / ErrorCode — failure payload shared by every adapter.
//! - TraceId — request correlation identifier.
//! - User, UserId, NewUser — user resources served by `/api/users`.
//! - LoginCredentials, TokenClaims, IssuedToken — auth endpoint primitives.
//! - FaultSettings — delay caps and error-injection rates.
//! - PayloadItem, UploadReceipt — synthetic bulk and upload payloads.

pub mod auth;
pub mod error;
pub mod faults;
pub mod payload;
pub mod ports;
pub mod trace_id;
pub mod user;

pub use self::auth::{
    IssuedToken, LoginCredentials, LoginValidationError, REJECTED_PASSWORD, TokenClaims,
    authenticate,
};
pub use self::error::{DomainError, Error, ErrorCode};
pub use self::faults::{FaultSettings, FaultSettingsError};
pub use self::payload::{PayloadItem, UploadReceipt};
pub use self::trace_id::TraceId;
pub use self::user::{NewUser, User, UserId, UserValidationError};

/// Response header carrying the request trace identifier.
pub const TRACE_ID_HEADER: &str = "trace-id";
