//! Backend entry-point: loads settings, wires storage and serves GraphQL.

mod server;

use actix_web::web;
use color_eyre::eyre::Result;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use eventgo::inbound::http::health::HealthState;
use server::{AppSettings, ServerConfig, build_http_state, build_wiring, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load()?;
    let wiring = build_wiring(&settings).await?;
    let http_state = web::Data::new(build_http_state(&wiring.ports, &settings));
    let health_state = web::Data::new(HealthState::new(wiring.storage));

    let bind_addr = settings.bind_addr()?;
    let config = ServerConfig::new(bind_addr).with_allowed_origins(settings.allowed_origins());
    let server = create_server(health_state, http_state, config)?;
    info!(%bind_addr, "eventgo listening");
    server.await?;
    Ok(())
}
