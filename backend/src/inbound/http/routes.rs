//! Route table for the mock API.

use actix_web::{HttpRequest, HttpResponse, ResponseError, web};

use super::error::json_error_handler;
use super::payload::UPLOAD_LIMIT_BYTES;
use super::{auth, delay, faults, health, payload, users};
use crate::domain::Error;

/// Maximum accepted JSON body.
pub const JSON_LIMIT_BYTES: usize = 1024 * 1024;

/// Register every endpoint.
///
/// Handlers expect [`super::state::HttpState`] and
/// [`health::HealthState`] as app data.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use mock_api::inbound::http::routes::{configure, not_found};
///
/// let _app = App::new()
///     .configure(configure)
///     .default_service(actix_web::web::to(not_found));
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(health::health)
        .service(health::ready)
        .service(health::live)
        .service(
            web::scope("/api")
                .app_data(
                    web::JsonConfig::default()
                        .limit(JSON_LIMIT_BYTES)
                        .error_handler(json_error_handler),
                )
                .app_data(web::PayloadConfig::new(UPLOAD_LIMIT_BYTES))
                .service(users::list_users)
                .service(users::get_user)
                .service(users::create_user)
                .service(users::update_user)
                .service(users::delete_user)
                .service(auth::login)
                .service(auth::me)
                .service(delay::delay)
                .service(delay::random_delay)
                .service(faults::status)
                .service(faults::random_error)
                .service(payload::large_payload)
                .service(payload::upload)
                .default_service(web::to(not_found)),
        );
}

/// Envelope-shaped 404 for unknown routes.
pub async fn not_found(req: HttpRequest) -> HttpResponse {
    Error::not_found(format!("no route for {} {}", req.method(), req.path())).error_response()
}
