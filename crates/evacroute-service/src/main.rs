//! Evacuation routing HTTP service.
//!
//! # Configuration
//!
//! - `EVACROUTE_BUILDING`: building definition JSON (default: built-in sample)
//! - `SERVICE_PORT`: HTTP port (default: 8080)
//! - `LOG_FORMAT`: `json` (default) or `text`
//! - `RUST_LOG`: log filter (default: `info`)

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use tracing::{error, info};

use evacroute_service::{app, init_logging, AppState, LoggingConfig};

const DEFAULT_PORT: u16 = 8080;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging(&LoggingConfig::from_env());

    let building_path = env::var_os("EVACROUTE_BUILDING").map(PathBuf::from);
    let port = env::var("SERVICE_PORT")
        .ok()
        .and_then(|port| port.parse().ok())
        .unwrap_or(DEFAULT_PORT);

    let state = AppState::load(building_path.as_deref()).map_err(|err| {
        error!(error = %err, path = ?building_path, "failed to load building");
        err
    })?;
    info!(
        building = %state.building().name,
        floors = state.building().floors.len(),
        "building loaded"
    );

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %addr, "listening");
    axum::serve(listener, app(state)).await?;

    Ok(())
}
