//! Mock API entry-point.

use std::net::TcpListener;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use mock_api::inbound::http::health::HealthState;
use mock_api::server::{ServerSettings, build_http_state, create_server, shutdown_on_signal};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ServerSettings::load_from_iter(std::env::args_os())
        .map_err(|e| std::io::Error::other(format!("failed to load settings: {e}")))?;
    if settings.uses_development_secret() {
        warn!("MOCK_API_JWT_SECRET is unset; signing tokens with the development secret");
    }
    let http_state = build_http_state(&settings).map_err(std::io::Error::other)?;

    let listener = TcpListener::bind(settings.bind_addr())?;
    let faults = http_state.faults;
    info!(
        addr = %listener.local_addr()?,
        error_rate = faults.error_rate(),
        max_delay_ms = u64::try_from(faults.max_delay().as_millis()).unwrap_or(u64::MAX),
        "mock API listening"
    );

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), http_state, listener)?;
    actix_web::rt::spawn(shutdown_on_signal(server.handle(), health_state));
    server.await
}
