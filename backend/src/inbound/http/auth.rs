//! Login and token introspection handlers.
//!
//! ```text
//! POST /api/auth/login {"username":"alice","password":"secret"}
//! GET  /api/auth/me    Authorization: Bearer <token>
//! ```

use actix_web::http::header;
use actix_web::{HttpRequest, HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use super::ApiResult;
use super::envelope::ok;
use super::state::HttpState;
use crate::domain::{Error, LoginCredentials, LoginValidationError, authenticate};

/// Login request body. Both fields are optional at the wire level so
/// missing values surface as validation errors rather than JSON errors.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct LoginRequest {
    /// Account name.
    pub username: Option<String>,
    /// Password; `"wrong"` is always rejected.
    pub password: Option<String>,
}

/// Successful login payload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    token: String,
    token_type: &'static str,
    expires_in: u64,
    user: LoginUser,
}

#[derive(Debug, Serialize)]
struct LoginUser {
    username: String,
}

fn map_login_validation_error(err: &LoginValidationError) -> Error {
    Error::invalid_request(err.to_string())
        .with_details(json!({ "field": err.field(), "code": "missing_field" }))
}

/// Extract the token from an `Authorization: Bearer <token>` header.
fn bearer_token(req: &HttpRequest) -> ApiResult<&str> {
    let raw = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or_else(|| Error::unauthorized("missing bearer token"))?
        .to_str()
        .map_err(|_| Error::unauthorized("malformed authorization header"))?;
    let (scheme, rest) = raw
        .split_once(' ')
        .ok_or_else(|| Error::unauthorized("malformed authorization header"))?;
    let token = rest.trim();
    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return Err(Error::unauthorized("malformed authorization header"));
    }
    Ok(token)
}

/// Issue a token for any credentials except the rejected password.
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let request = payload.into_inner();
    let credentials =
        LoginCredentials::try_from_parts(request.username.as_deref(), request.password.as_deref())
            .map_err(|err| map_login_validation_error(&err))?;
    if let Err(err) = authenticate(&credentials) {
        info!(username = credentials.username(), "login rejected");
        return Err(err);
    }
    let issued = state.tokens.issue(credentials.username())?;
    Ok(ok(LoginResponse {
        token: issued.token,
        token_type: "Bearer",
        expires_in: issued.expires_in,
        user: LoginUser {
            username: credentials.username().to_owned(),
        },
    }))
}

/// Describe the caller's bearer token.
#[get("/auth/me")]
pub async fn me(state: web::Data<HttpState>, req: HttpRequest) -> ApiResult<HttpResponse> {
    let token = bearer_token(&req)?;
    let claims = state.tokens.verify(token)?;
    Ok(ok(json!({
        "username": claims.sub,
        "issuedAt": claims.iat,
        "expiresAt": claims.exp,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::MockTokenService;
    use crate::inbound::http::test_utils::fixture_state;
    use crate::inbound::http::state::HttpState;
    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use rstest::rstest;
    use serde_json::Value;
    use std::sync::Arc;

    async fn call_with(state: HttpState, req: test::TestRequest) -> (StatusCode, Value) {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .service(web::scope("/api").service(login).service(me)),
        )
        .await;
        let res = test::call_service(&app, req.to_request()).await;
        let status = res.status();
        (status, test::read_body_json(res).await)
    }

    async fn call(req: test::TestRequest) -> (StatusCode, Value) {
        call_with(fixture_state(), req).await
    }

    fn login_request(body: Value) -> test::TestRequest {
        test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(body)
    }

    #[actix_rt::test]
    async fn login_issues_bearer_token() {
        let (status, body) =
            call(login_request(json!({"username": "alice", "password": "secret"}))).await;
        assert_eq!(status, StatusCode::OK);
        let token = body
            .pointer("/data/token")
            .and_then(Value::as_str)
            .expect("token");
        assert!(!token.is_empty());
        assert_eq!(body.pointer("/data/tokenType"), Some(&json!("Bearer")));
        assert_eq!(body.pointer("/data/expiresIn"), Some(&json!(3_600)));
        assert_eq!(body.pointer("/data/user/username"), Some(&json!("alice")));
    }

    #[actix_rt::test]
    async fn wrong_password_is_unauthorized() {
        let (status, body) =
            call(login_request(json!({"username": "alice", "password": "wrong"}))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body.get("success"), Some(&json!(false)));
    }

    #[rstest]
    #[case(json!({"password": "pw"}))]
    #[case(json!({"username": "alice"}))]
    #[case(json!({"username": " ", "password": "pw"}))]
    #[case(json!({"username": "alice", "password": ""}))]
    #[actix_rt::test]
    async fn missing_credentials_are_bad_requests(#[case] body: Value) {
        let (status, body) = call(login_request(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.get("code"), Some(&json!("invalid_request")));
    }

    #[actix_rt::test]
    async fn me_round_trips_issued_token() {
        let state = fixture_state();
        let issued = state.tokens.issue("bob").expect("issue token");
        let (status, body) = call_with(
            state,
            test::TestRequest::get()
                .uri("/api/auth/me")
                .insert_header((header::AUTHORIZATION, format!("Bearer {}", issued.token))),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.pointer("/data/username"), Some(&json!("bob")));
    }

    #[rstest]
    #[case(None)]
    #[case(Some("Bearer"))]
    #[case(Some("Basic Ym9iOnB3"))]
    #[case(Some("Bearer not.a.token"))]
    #[actix_rt::test]
    async fn me_rejects_missing_or_invalid_tokens(#[case] header_value: Option<&str>) {
        let mut req = test::TestRequest::get().uri("/api/auth/me");
        if let Some(value) = header_value {
            req = req.insert_header((header::AUTHORIZATION, value));
        }
        let (status, body) = call(req).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body.get("code"), Some(&json!("unauthorized")));
    }

    #[actix_rt::test]
    async fn signing_failures_surface_as_redacted_500() {
        let mut tokens = MockTokenService::new();
        tokens
            .expect_issue()
            .times(1)
            .returning(|_| Err(Error::internal("key material unavailable")));
        let mut state = fixture_state();
        state.tokens = Arc::new(tokens);
        let (status, body) = call_with(
            state,
            login_request(json!({"username": "alice", "password": "secret"})),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.get("code"), Some(&json!("internal_error")));
        assert_ne!(body.get("error"), Some(&json!("key material unavailable")));
    }
}
