//! End-to-end behaviour of the assembled application with production
//! adapters.

use std::sync::Arc;
use std::time::{Duration, Instant};

use actix_web::http::StatusCode;
use actix_web::{test, web};
use mockable::DefaultClock;
use rstest::rstest;
use serde_json::{Value, json};

use mock_api::domain::FaultSettings;
use mock_api::domain::TRACE_ID_HEADER;
use mock_api::inbound::http::health::HealthState;
use mock_api::inbound::http::state::HttpState;
use mock_api::outbound::{JwtTokenService, ThreadRandomness};
use mock_api::server::{ServerSettings, build_app, build_http_state};

fn production_state(max_delay: Duration) -> HttpState {
    HttpState::new(
        Arc::new(ThreadRandomness),
        Arc::new(JwtTokenService::new(b"contract-secret", Duration::from_secs(60))),
        Arc::new(DefaultClock),
    )
    .with_faults(FaultSettings::new(0.2, max_delay).expect("valid fault settings"))
}

macro_rules! app {
    ($state:expr) => {
        test::init_service(build_app(
            web::Data::new(HealthState::new()),
            web::Data::new($state),
        ))
        .await
    };
}

#[actix_rt::test]
async fn random_error_rate_is_close_to_twenty_percent() {
    let app = app!(production_state(Duration::ZERO));
    let mut failures = 0_u32;
    for _ in 0..1_000 {
        let res = test::call_service(
            &app,
            test::TestRequest::get().uri("/api/random-error").to_request(),
        )
        .await;
        if res.status() == StatusCode::INTERNAL_SERVER_ERROR {
            failures += 1;
        } else {
            assert_eq!(res.status(), StatusCode::OK);
        }
    }
    assert!(
        (140..=260).contains(&failures),
        "observed {failures} failures in 1000 requests"
    );
}

#[rstest]
#[case(30, 30)]
#[case(400, 100)]
#[actix_rt::test]
async fn delay_latency_tracks_capped_request(#[case] requested: u64, #[case] expected: u64) {
    let app = app!(production_state(Duration::from_millis(100)));
    let started = Instant::now();
    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/api/delay/{requested}"))
            .to_request(),
    )
    .await;
    let elapsed = started.elapsed();
    assert_eq!(res.status(), StatusCode::OK);
    assert!(elapsed >= Duration::from_millis(expected));
    assert!(elapsed < Duration::from_millis(expected + 1_000));
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body.pointer("/data/delayed"), Some(&json!(expected)));
}

#[actix_rt::test]
async fn login_then_me_returns_original_username() {
    let app = app!(production_state(Duration::ZERO));
    let login = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({"username": "carol", "password": "hunter2"}))
            .to_request(),
    )
    .await;
    assert_eq!(login.status(), StatusCode::OK);
    let body: Value = test::read_body_json(login).await;
    let token = body
        .pointer("/data/token")
        .and_then(Value::as_str)
        .expect("token");

    let me = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/auth/me")
            .insert_header(("Authorization", format!("Bearer {token}")))
            .to_request(),
    )
    .await;
    assert_eq!(me.status(), StatusCode::OK);
    let body: Value = test::read_body_json(me).await;
    assert_eq!(body.pointer("/data/username"), Some(&json!("carol")));
}

#[actix_rt::test]
async fn created_user_ids_stay_within_range() {
    let app = app!(production_state(Duration::ZERO));
    for _ in 0..50 {
        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/users")
                .set_json(json!({"name": "Dana", "email": "dana@example.com"}))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(res).await;
        let id = body
            .pointer("/data/id")
            .and_then(Value::as_u64)
            .expect("numeric id");
        assert!((1..=10_000).contains(&id));
    }
}

#[actix_rt::test]
async fn errors_carry_trace_id_matching_header() {
    let app = app!(production_state(Duration::ZERO));
    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/users")
            .set_json(json!({"email": "nobody@example.com"}))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let header = res
        .headers()
        .get(TRACE_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
        .expect("trace id header");
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body.get("traceId").and_then(Value::as_str), Some(header.as_str()));
}

#[rstest]
#[case("/nope")]
#[case("/api/nope")]
#[actix_rt::test]
async fn unknown_routes_use_error_envelope(#[case] uri: &str) {
    let app = app!(production_state(Duration::ZERO));
    let res = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body.get("success"), Some(&json!(false)));
    assert_eq!(body.get("code"), Some(&json!("not_found")));
}

#[actix_rt::test]
async fn malformed_json_is_a_bad_request_envelope() {
    let app = app!(production_state(Duration::ZERO));
    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/users")
            .insert_header(("Content-Type", "application/json"))
            .set_payload("{not json")
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body.get("success"), Some(&json!(false)));
}

#[::core::prelude::v1::test]
fn default_settings_build_state() {
    let state = build_http_state(&ServerSettings::default()).expect("defaults are valid");
    assert_eq!(state.max_payload_items, 10_000);
}
