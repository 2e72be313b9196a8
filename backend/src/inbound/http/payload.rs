//! Bulk transfer handlers.
//!
//! ```text
//! GET  /api/large-payload?size=N
//! POST /api/upload
//! ```

use actix_web::http::header;
use actix_web::{HttpRequest, HttpResponse, get, post, web};
use serde::Deserialize;
use tracing::debug;

use super::ApiResult;
use super::envelope::{created, ok};
use super::state::HttpState;
use crate::domain::payload::{resolve_size, synthesize_items};
use crate::domain::{Error, UploadReceipt};

/// Maximum accepted upload body.
pub const UPLOAD_LIMIT_BYTES: usize = 10 * 1024 * 1024;

/// Query for `GET /api/large-payload`. `size` is kept as text so that
/// non-numeric values map to the standard error envelope.
#[derive(Debug, Default, Deserialize)]
pub struct LargePayloadQuery {
    size: Option<String>,
}

/// Return a list of synthetic items.
#[get("/large-payload")]
pub async fn large_payload(
    state: web::Data<HttpState>,
    query: web::Query<LargePayloadQuery>,
) -> ApiResult<HttpResponse> {
    let requested = query
        .size
        .as_deref()
        .map(|raw| {
            raw.trim()
                .parse::<usize>()
                .map_err(|_| Error::invalid_request("size must be a non-negative integer"))
        })
        .transpose()?;
    let count = resolve_size(requested, state.max_payload_items);
    debug!(requested = ?requested, count, "serving large payload");
    Ok(ok(synthesize_items(count, state.randomness.as_ref())))
}

/// Accept and discard an arbitrary body.
#[post("/upload")]
pub async fn upload(
    state: web::Data<HttpState>,
    req: HttpRequest,
    body: web::Bytes,
) -> HttpResponse {
    let content_type = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok());
    let receipt = UploadReceipt::acknowledge(
        body.len(),
        content_type,
        state.randomness.as_ref(),
        state.now(),
    );
    debug!(size = receipt.size, content_type = %receipt.content_type, "accepted upload");
    created(receipt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inbound::http::test_utils::{FIXED_NOW, fixture_state};
    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use rstest::rstest;
    use serde_json::{Value, json};

    async fn call(req: test::TestRequest) -> (StatusCode, Value) {
        let state = fixture_state().with_max_payload_items(500);
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .service(web::scope("/api").service(large_payload).service(upload)),
        )
        .await;
        let res = test::call_service(&app, req.to_request()).await;
        let status = res.status();
        (status, test::read_body_json(res).await)
    }

    #[rstest]
    #[case("/api/large-payload", 100)]
    #[case("/api/large-payload?size=3", 3)]
    #[case("/api/large-payload?size=0", 0)]
    #[case("/api/large-payload?size=100000", 500)]
    #[actix_rt::test]
    async fn large_payload_respects_default_and_cap(#[case] uri: &str, #[case] expected: usize) {
        let (status, body) = call(test::TestRequest::get().uri(uri)).await;
        assert_eq!(status, StatusCode::OK);
        let items = body
            .get("data")
            .and_then(Value::as_array)
            .expect("data array");
        assert_eq!(items.len(), expected);
    }

    #[actix_rt::test]
    async fn large_payload_items_have_expected_shape() {
        let (_, body) = call(test::TestRequest::get().uri("/api/large-payload?size=1")).await;
        let item = body.pointer("/data/0").expect("first item");
        for key in ["id", "name", "description", "value", "tags"] {
            assert!(item.get(key).is_some(), "missing {key}");
        }
    }

    #[actix_rt::test]
    async fn non_numeric_size_is_rejected() {
        let (status, body) = call(test::TestRequest::get().uri("/api/large-payload?size=lots")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.get("success"), Some(&json!(false)));
    }

    #[actix_rt::test]
    async fn upload_acknowledges_body() {
        let (status, body) = call(
            test::TestRequest::post()
                .uri("/api/upload")
                .insert_header((header::CONTENT_TYPE, "text/plain"))
                .set_payload("hello world"),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let data = body.get("data").expect("data");
        assert_eq!(data.get("size"), Some(&json!(11)));
        assert_eq!(data.get("contentType"), Some(&json!("text/plain")));
        assert_eq!(data.get("uploadedAt"), Some(&json!(FIXED_NOW)));
        assert!(data.get("fileId").and_then(Value::as_str).is_some());
    }
}
