//! Latency injection handlers.
//!
//! ```text
//! GET /api/delay/{ms}
//! GET /api/random-delay
//! ```

use std::time::Duration;

use actix_web::{HttpResponse, get, web};
use serde::Serialize;
use tracing::debug;

use super::ApiResult;
use super::envelope::ok;
use super::state::HttpState;
use crate::domain::Error;
use crate::domain::faults::RANDOM_DELAY_MS;

#[derive(Debug, Serialize)]
struct DelayReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    requested: Option<u64>,
    delayed: u64,
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Sleep for the requested milliseconds, capped by the configured maximum.
#[get("/delay/{ms}")]
pub async fn delay(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let requested: u64 = path
        .trim()
        .parse()
        .map_err(|_| Error::invalid_request("delay must be a non-negative integer of milliseconds"))?;
    let applied = state.faults.clamp_delay(requested);
    debug!(requested_ms = requested, delayed_ms = millis(applied), "applying delay");
    tokio::time::sleep(applied).await;
    Ok(ok(DelayReport {
        requested: Some(requested),
        delayed: millis(applied),
    }))
}

/// Sleep for a uniformly drawn duration.
#[get("/random-delay")]
pub async fn random_delay(state: web::Data<HttpState>) -> HttpResponse {
    let delayed = state.randomness.in_range(RANDOM_DELAY_MS);
    debug!(delayed_ms = delayed, "applying random delay");
    tokio::time::sleep(Duration::from_millis(delayed)).await;
    ok(DelayReport {
        requested: None,
        delayed,
    })
}
