//! Status-code echo and random failure handlers.
//!
//! ```text
//! GET /api/status/{code}
//! GET /api/random-error
//! ```

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, get, web};
use serde_json::json;
use tracing::warn;

use super::ApiResult;
use super::envelope::{Envelope, ok};
use super::state::HttpState;
use crate::domain::Error;
use crate::domain::faults::is_echoable_status;

/// Statuses whose responses never carry a body on the wire.
const fn forbids_body(code: StatusCode) -> bool {
    matches!(
        code,
        StatusCode::NO_CONTENT | StatusCode::RESET_CONTENT | StatusCode::NOT_MODIFIED
    )
}

/// Respond with the requested status code. `204`, `205` and `304` are sent
/// without a body; every other code carries a `{status}` payload.
#[get("/status/{code}")]
pub async fn status(path: web::Path<String>) -> ApiResult<HttpResponse> {
    let code = path
        .trim()
        .parse::<u16>()
        .ok()
        .filter(|code| is_echoable_status(*code))
        .and_then(|code| StatusCode::from_u16(code).ok())
        .ok_or_else(|| Error::invalid_request("status code must be an integer in 200..=599"))?;
    if forbids_body(code) {
        return Ok(HttpResponse::build(code).finish());
    }
    let status = code.as_u16();
    if code.is_client_error() || code.is_server_error() {
        return Ok(HttpResponse::build(code).json(json!({
            "success": false,
            "error": code.canonical_reason().unwrap_or("requested status"),
            "status": status,
        })));
    }
    Ok(Envelope::success(json!({ "status": status })).respond(code))
}

/// Fail with the configured probability.
#[get("/random-error")]
pub async fn random_error(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    if state.randomness.chance(state.faults.error_rate()) {
        warn!(error_rate = state.faults.error_rate(), "injecting random failure");
        return Err(Error::injected_fault("random failure injected"));
    }
    Ok(ok(json!({ "message": "request succeeded" })))
}
