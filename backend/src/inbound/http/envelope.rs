//! Success envelope shared by every `/api` handler.
//!
//! ```text
//! {"success": true, "data": { ... }}
//! ```
//!
//! Failures use the error envelope rendered in [`super::error`].

use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use serde::Serialize;

/// Wrapper serialised as `{"success": true, "data": ...}`.
#[derive(Debug, Clone, Serialize)]
pub struct Envelope<T> {
    success: bool,
    data: T,
}

impl<T: Serialize> Envelope<T> {
    /// Wrap `data` as a successful payload.
    #[must_use]
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }

    /// Render with the given status.
    #[must_use]
    pub fn respond(&self, status: StatusCode) -> HttpResponse {
        HttpResponse::build(status).json(self)
    }
}

/// `200 OK` with `data` in the success envelope.
#[must_use]
pub fn ok<T: Serialize>(data: T) -> HttpResponse {
    Envelope::success(data).respond(StatusCode::OK)
}

/// `201 Created` with `data` in the success envelope.
#[must_use]
pub fn created<T: Serialize>(data: T) -> HttpResponse {
    Envelope::success(data).respond(StatusCode::CREATED)
}
