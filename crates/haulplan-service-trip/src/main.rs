//! Trip comparison HTTP microservice entry point.
//!
//! # Configuration
//!
//! - `HAULPLAN_STATIONS` - comma-separated charging station CSV paths (required)
//! - `HAULPLAN_MAX_LEG_MILES` - maximum leg between charges (default: 225)
//! - `SERVICE_PORT` - HTTP port (default: 8080)
//! - `ORS_API_KEY` - OpenRouteService key (required)
//! - `ORS_BASE_URL`, `NOMINATIM_BASE_URL` - collaborator endpoints
//! - `EIA_API_KEY` - live diesel price feed (optional)
//! - `RUST_LOG`, `LOG_FORMAT` - logging
//! - `METRICS_ENABLED`, `METRICS_PATH` - Prometheus endpoint

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use tracing::{error, info, warn};

use haulplan_lib::{ExternalConfig, ServiceConfig};
use haulplan_service_shared::{
    init_logging, init_metrics, AppState, LoggingConfig, MetricsConfig, MetricsError,
};
use haulplan_service_trip::app;

fn station_paths() -> Vec<PathBuf> {
    env::var("HAULPLAN_STATIONS")
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(PathBuf::from)
        .collect()
}

fn service_config() -> ServiceConfig {
    let mut config = ServiceConfig::default();
    if let Ok(raw) = env::var("HAULPLAN_MAX_LEG_MILES") {
        match raw.trim().parse::<f64>() {
            Ok(miles) if miles.is_finite() && miles > 0.0 => config.max_leg_miles = miles,
            _ => warn!(value = %raw, "ignoring invalid HAULPLAN_MAX_LEG_MILES"),
        }
    }
    config
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging(&LoggingConfig::from_env().with_service("trip"));

    let metrics_config = MetricsConfig::from_env();
    match init_metrics(&metrics_config) {
        Ok(()) | Err(MetricsError::Disabled) => {}
        Err(e) => warn!(error = %e, "failed to initialize metrics, continuing without metrics"),
    }

    let port: u16 = env::var("SERVICE_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);
    let paths = station_paths();
    let config = service_config();

    info!(
        stations = ?paths,
        port,
        max_leg_miles = config.max_leg_miles,
        "starting trip service"
    );

    let state = AppState::load(&paths, &ExternalConfig::from_env(), config).map_err(|e| {
        error!(error = %e, "failed to load application state");
        e
    })?;
    info!(stations = state.network().len(), "application state loaded");

    let router = app(state, &metrics_config);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!(addr = %addr, "listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
