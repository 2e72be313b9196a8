//! HTTP adapter mapping for domain errors.
//!
//! Keeps the domain error type HTTP-agnostic while turning failures into the
//! `{"success": false, "error": ...}` envelope with a matching status code.

use actix_web::error::{JsonPayloadError, PayloadError};
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, ResponseError};
use serde::Serialize;
use serde_json::{Value, json};

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

const REDACTED_MESSAGE: &str = "Internal server error";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorEnvelope<'a> {
    success: bool,
    error: &'a str,
    code: ErrorCode,
    #[serde(skip_serializing_if = "Option::is_none")]
    trace_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<&'a Value>,
}

const fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::InjectedFault | ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        if let Some(id) = self.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }
        // Injected faults keep their message.
        let internal = matches!(self.code(), ErrorCode::InternalError);
        builder.json(ErrorEnvelope {
            success: false,
            error: if internal {
                REDACTED_MESSAGE
            } else {
                self.message()
            },
            code: self.code(),
            trace_id: self.trace_id(),
            details: if internal { None } else { self.details() },
        })
    }
}

/// Turn JSON extractor failures into `400` envelopes.
#[must_use]
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let message = match &err {
        JsonPayloadError::ContentType => "expected an application/json body".to_owned(),
        JsonPayloadError::OverflowKnownLength { .. } | JsonPayloadError::Overflow { .. } => {
            "request body is too large".to_owned()
        }
        JsonPayloadError::Payload(PayloadError::Overflow) => "request body is too large".to_owned(),
        other => format!("invalid JSON body: {other}"),
    };
    Error::invalid_request(message)
        .with_details(json!({ "code": "invalid_json" }))
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;
    use rstest::rstest;

    async fn body_of(error: &Error) -> (StatusCode, Value) {
        let response = error.error_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body()).await.expect("body bytes");
        (status, serde_json::from_slice(&bytes).expect("json body"))
    }

    #[rstest]
    #[case(Error::invalid_request("bad"), StatusCode::BAD_REQUEST)]
    #[case(Error::unauthorized("no"), StatusCode::UNAUTHORIZED)]
    #[case(Error::not_found("gone"), StatusCode::NOT_FOUND)]
    #[case(Error::injected_fault("boom"), StatusCode::INTERNAL_SERVER_ERROR)]
    #[case(Error::internal("oops"), StatusCode::INTERNAL_SERVER_ERROR)]
    fn maps_codes_to_statuses(#[case] error: Error, #[case] expected: StatusCode) {
        assert_eq!(error.status_code(), expected);
    }

    #[actix_rt::test]
    async fn envelope_carries_message_code_and_details() {
        let error = Error::invalid_request("name is required")
            .with_details(json!({"field": "name"}))
            .with_trace_id("abc");
        let (status, value) = body_of(&error).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            value,
            json!({
                "success": false,
                "error": "name is required",
                "code": "invalid_request",
                "traceId": "abc",
                "details": {"field": "name"},
            })
        );
    }

    #[actix_rt::test]
    async fn internal_errors_are_redacted() {
        let error = Error::internal("db password is hunter2").with_details(json!({"secret": 1}));
        let (_, value) = body_of(&error).await;
        assert_eq!(value.get("error"), Some(&json!(REDACTED_MESSAGE)));
        assert!(value.get("details").is_none());
    }

    #[actix_rt::test]
    async fn json_extractor_failures_become_invalid_requests() {
        let req = actix_web::test::TestRequest::default().to_http_request();
        let err = json_error_handler(JsonPayloadError::ContentType, &req);
        let response = err.error_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = to_bytes(response.into_body()).await.expect("body bytes");
        let value: Value = serde_json::from_slice(&bytes).expect("json body");
        assert_eq!(value.get("code"), Some(&json!("invalid_request")));
        assert_eq!(
            value.get("error"),
            Some(&json!("expected an application/json body"))
        );
    }

    #[actix_rt::test]
    async fn injected_faults_keep_their_message() {
        let (status, value) = body_of(&Error::injected_fault("random failure")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(value.get("error"), Some(&json!("random failure")));
        assert_eq!(value.get("code"), Some(&json!("injected_fault")));
    }
}
