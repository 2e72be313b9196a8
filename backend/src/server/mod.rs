//! Server construction, wiring and shutdown.

mod config;

pub use config::{DEVELOPMENT_JWT_SECRET, ServerSettings, SettingsError};

use std::io;
use std::net::TcpListener;
use std::sync::Arc;

use actix_web::dev::{Server, ServerHandle, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use mockable::DefaultClock;
#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};
use tracing::{info, warn};

use crate::Trace;
use crate::inbound::http::health::HealthState;
use crate::inbound::http::routes::{configure, not_found};
use crate::inbound::http::state::HttpState;
use crate::outbound::{JwtTokenService, ThreadRandomness};

/// Build handler state from settings using the production adapters.
pub fn build_http_state(settings: &ServerSettings) -> Result<HttpState, SettingsError> {
    let tokens = JwtTokenService::new(settings.jwt_secret()?, settings.token_ttl());
    Ok(HttpState::new(
        Arc::new(ThreadRandomness),
        Arc::new(tokens),
        Arc::new(DefaultClock),
    )
    .with_faults(settings.faults()?)
    .with_max_payload_items(settings.max_payload_items()))
}

/// Assemble the application: trace middleware, state and routes.
#[must_use]
pub fn build_app(
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .configure(configure)
        .default_service(web::to(not_found))
}

/// Construct a server on an already-bound listener.
///
/// Readiness is flagged once the listener is attached. OS signal handling is
/// left to [`shutdown_on_signal`] so liveness can fail before the drain.
///
/// # Errors
/// Propagates [`std::io::Error`] when attaching the listener fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    http_state: HttpState,
    listener: TcpListener,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let shared_state = web::Data::new(http_state);
    let server = HttpServer::new(move || {
        build_app(server_health_state.clone(), shared_state.clone())
    })
    .disable_signals()
    .listen(listener)?
    .run();

    health_state.mark_ready();
    Ok(server)
}

/// Wait for SIGINT or SIGTERM, fail liveness, then stop gracefully.
pub async fn shutdown_on_signal(handle: ServerHandle, health_state: web::Data<HealthState>) {
    drain_after(termination_signal(), handle, health_state).await;
}

/// Fail liveness and drain connections once `trigger` resolves.
///
/// The server keeps running when listening for the signal fails.
pub async fn drain_after<F>(trigger: F, handle: ServerHandle, health_state: web::Data<HealthState>)
where
    F: Future<Output = io::Result<()>>,
{
    if let Err(err) = trigger.await {
        warn!(error = %err, "failed to listen for shutdown signal");
        return;
    }
    info!("shutdown requested; draining connections");
    health_state.mark_unhealthy();
    handle.stop(true).await;
}

#[cfg(unix)]
async fn termination_signal() -> io::Result<()> {
    let mut terminate = signal(SignalKind::terminate())?;
    tokio::select! {
        result = tokio::signal::ctrl_c() => result,
        _ = terminate.recv() => Ok(()),
    }
}

#[cfg(not(unix))]
async fn termination_signal() -> io::Result<()> {
    tokio::signal::ctrl_c().await
}
