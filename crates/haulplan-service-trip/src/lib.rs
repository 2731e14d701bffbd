//! Trip comparison HTTP microservice.
//!
//! # Endpoints
//!
//! - `POST /api/v1/trip` - compare diesel and electric for a trip between two places
//! - `GET /metrics` - Prometheus metrics
//! - `GET /health/live` - liveness probe
//! - `GET /health/ready` - readiness probe
//!
//! The router is built here so tests can drive it without binding a socket;
//! `main.rs` only reads configuration and serves it.

use axum::{
    extract::{rejection::JsonRejection, State},
    middleware::from_fn,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tower_http::cors::CorsLayer;
use tracing::{error, info, warn};

use haulplan_lib::PriceProvenance;
use haulplan_service_shared::{
    failure_reason, from_lib_error, health_live, health_ready, metrics_handler,
    record_charging_stops, record_price_fallback, record_trip_failed, record_trip_planned,
    track_requests, AppState, MetricsConfig, ProblemDetails, RequestId, ServiceResponse,
    TripRequest, Validate,
};

/// Build the service router. The metrics route is mounted only when
/// `metrics.enabled`.
pub fn app(state: AppState, metrics: &MetricsConfig) -> Router {
    let mut router = Router::new()
        .route("/api/v1/trip", post(trip_handler))
        .route("/health/live", get(health_live))
        .route("/health/ready", get(health_ready));
    if metrics.enabled {
        router = router.route(&metrics.path, get(metrics_handler));
    }

    router
        .layer(from_fn(track_requests))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Handle `POST /api/v1/trip`.
///
/// Geocoding and road routing are blocking HTTP calls, so planning runs on
/// the blocking pool.
pub async fn trip_handler(
    State(state): State<AppState>,
    request_id: RequestId,
    payload: Result<Json<TripRequest>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            record_trip_failed("validation_error");
            return ProblemDetails::bad_request(rejection.body_text(), request_id.as_str())
                .into_response();
        }
    };

    info!(
        request_id = %request_id,
        from = %request.from,
        to = %request.to,
        trips_per_year = request.trips_per_year,
        algorithm = ?request.algorithm,
        "handling trip request"
    );

    if let Err(problem) = request.validate(request_id.as_str()) {
        record_trip_failed("validation_error");
        return problem.into_response();
    }

    let query = request.to_query();
    let worker_state = state.clone();
    let outcome =
        tokio::task::spawn_blocking(move || worker_state.service().plan_trip(&query)).await;

    let report = match outcome {
        Ok(Ok(report)) => report,
        Ok(Err(e)) => {
            let reason = failure_reason(&e);
            if reason == "place_not_found" || reason == "validation_error" {
                warn!(request_id = %request_id, error = %e, "trip request rejected");
            } else {
                error!(request_id = %request_id, error = %e, "trip planning failed");
            }
            record_trip_failed(reason);
            return from_lib_error(&e, request_id.as_str()).into_response();
        }
        Err(join_error) => {
            error!(request_id = %request_id, error = %join_error, "trip planning task failed");
            record_trip_failed("internal_error");
            return ProblemDetails::internal_error("trip planning task failed", request_id.as_str())
                .into_response();
        }
    };

    let algorithm = report.electric.algorithm.to_string();
    record_trip_planned(&algorithm, report.electric.feasible);
    if report.electric.feasible {
        record_charging_stops(report.electric.stops.len(), &algorithm);
    }
    if report.diesel_price.provenance == PriceProvenance::Fallback {
        record_price_fallback();
    }

    info!(
        request_id = %request_id,
        diesel_miles = report.diesel.road_miles,
        electric_feasible = report.electric.feasible,
        stops = report.electric.stops.len(),
        "trip compared"
    );

    ServiceResponse::new(report).into_response()
}
