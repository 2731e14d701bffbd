//! Prometheus metrics for haulplan services.
//!
//! ```no_run
//! use haulplan_service_shared::metrics::{init_metrics, metrics_handler, MetricsConfig};
//! use axum::{routing::get, Router};
//!
//! let config = MetricsConfig::from_env();
//! init_metrics(&config).expect("failed to initialize metrics");
//!
//! let app: Router = Router::new().route(&config.path, get(metrics_handler));
//! ```

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

static PROMETHEUS_HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    pub enabled: bool,
    /// Route for the exposition endpoint.
    pub path: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "/metrics".to_string(),
        }
    }
}

impl MetricsConfig {
    /// Read `METRICS_ENABLED` (anything but "false" enables) and
    /// `METRICS_PATH`.
    pub fn from_env() -> Self {
        Self::from_values(
            std::env::var("METRICS_ENABLED").ok().as_deref(),
            std::env::var("METRICS_PATH").ok().as_deref(),
        )
    }

    fn from_values(enabled: Option<&str>, path: Option<&str>) -> Self {
        let defaults = Self::default();
        Self {
            enabled: enabled
                .map(|v| !v.trim().eq_ignore_ascii_case("false"))
                .unwrap_or(defaults.enabled),
            path: path
                .map(str::trim)
                .filter(|p| p.starts_with('/'))
                .map(str::to_string)
                .unwrap_or(defaults.path),
        }
    }
}

/// Install the global Prometheus recorder. Call once at startup.
///
/// # Errors
///
/// [`MetricsError::Disabled`] when turned off by configuration, otherwise
/// an install failure or a second initialization.
pub fn init_metrics(config: &MetricsConfig) -> Result<(), MetricsError> {
    if !config.enabled {
        return Err(MetricsError::Disabled);
    }

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| MetricsError::InstallFailed(e.to_string()))?;

    PROMETHEUS_HANDLE
        .set(handle)
        .map_err(|_| MetricsError::AlreadyInitialized)?;

    Ok(())
}

/// Returns `None` until [`init_metrics`] succeeds.
pub fn prometheus_handle() -> Option<&'static PrometheusHandle> {
    PROMETHEUS_HANDLE.get()
}

/// `GET /metrics` in Prometheus exposition format.
pub async fn metrics_handler() -> String {
    PROMETHEUS_HANDLE
        .get()
        .map(|h| h.render())
        .unwrap_or_else(|| "# Metrics not initialized\n".to_string())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetricsError {
    Disabled,
    AlreadyInitialized,
    InstallFailed(String),
}

impl std::fmt::Display for MetricsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MetricsError::Disabled => write!(f, "metrics are disabled"),
            MetricsError::AlreadyInitialized => write!(f, "metrics recorder already initialized"),
            MetricsError::InstallFailed(e) => {
                write!(f, "failed to install metrics recorder: {}", e)
            }
        }
    }
}

impl std::error::Error for MetricsError {}

// =============================================================================
// Business Metrics Helpers
// =============================================================================

/// Increment `haulplan_trips_planned_total`.
///
/// `electric_feasible` distinguishes comparisons where an electric route
/// existed from diesel-only answers.
pub fn record_trip_planned(algorithm: &str, electric_feasible: bool) {
    metrics::counter!(
        "haulplan_trips_planned_total",
        "algorithm" => algorithm.to_string(),
        "electric_feasible" => if electric_feasible { "true" } else { "false" }
    )
    .increment(1);
}

/// Increment `haulplan_trips_failed_total`, labelled with a reason from
/// [`crate::failure_reason`] or `validation_error`.
pub fn record_trip_failed(reason: &str) {
    metrics::counter!(
        "haulplan_trips_failed_total",
        "reason" => reason.to_string()
    )
    .increment(1);
}

/// Record to the `haulplan_charging_stops` histogram.
pub fn record_charging_stops(stops: usize, algorithm: &str) {
    metrics::histogram!(
        "haulplan_charging_stops",
        "algorithm" => algorithm.to_string()
    )
    .record(stops as f64);
}

/// Increment `haulplan_diesel_price_fallback_total` when a report used the
/// constant diesel price instead of the live feed.
pub fn record_price_fallback() {
    metrics::counter!("haulplan_diesel_price_fallback_total").increment(1);
}
