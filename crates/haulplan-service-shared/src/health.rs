//! Liveness and readiness probe handlers.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::AppState;

/// Body of `/health/live` and `/health/ready`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    /// "ok", or "not_ready: <reason>".
    pub status: String,

    pub service: String,

    pub version: String,

    /// RFC 3339 time the probe was answered.
    pub checked_at: String,

    /// Charging stations in the loaded network (readiness only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stations_loaded: Option<usize>,

    /// Configured maximum leg (readiness only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_leg_miles: Option<f64>,
}

fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

impl HealthStatus {
    pub fn alive(service: &str, version: &str) -> Self {
        Self {
            status: "ok".to_string(),
            service: service.to_string(),
            version: version.to_string(),
            checked_at: now(),
            stations_loaded: None,
            max_leg_miles: None,
        }
    }

    pub fn ready(service: &str, version: &str, stations: usize, max_leg_miles: f64) -> Self {
        Self {
            stations_loaded: Some(stations),
            max_leg_miles: Some(max_leg_miles),
            ..Self::alive(service, version)
        }
    }

    pub fn not_ready(service: &str, version: &str, reason: &str) -> Self {
        Self {
            status: format!("not_ready: {}", reason),
            ..Self::alive(service, version)
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

/// `GET /health/live`: 200 whenever the process is serving requests.
pub async fn health_live() -> impl IntoResponse {
    let status = HealthStatus::alive(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    (StatusCode::OK, Json(status))
}

/// `GET /health/ready`: 200 once the charging network holds at least one
/// station, 503 otherwise.
///
/// ```text
/// GET /health/ready
/// {"status":"ok","service":"haulplan-service-shared","version":"0.1.0","checked_at":"2026-01-05T10:00:00Z","stations_loaded":19,"max_leg_miles":225.0}
/// ```
pub async fn health_ready(State(state): State<AppState>) -> Response {
    let service = env!("CARGO_PKG_NAME");
    let version = env!("CARGO_PKG_VERSION");

    let stations = state.network().len();
    if stations == 0 {
        let status = HealthStatus::not_ready(service, version, "no charging stations loaded");
        return (StatusCode::SERVICE_UNAVAILABLE, Json(status)).into_response();
    }

    let status = HealthStatus::ready(service, version, stations, state.config().max_leg_miles);
    (StatusCode::OK, Json(status)).into_response()
}
