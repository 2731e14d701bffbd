//! Shared infrastructure for haulplan HTTP services.
//!
//! - [`AppState`]: the loaded charging network and the trip planning service
//! - [`health`]: liveness and readiness probe handlers
//! - [`ProblemDetails`]: RFC 9457 error bodies
//! - [`ServiceResponse`]: success wrapper carrying a content type
//! - [`metrics`]: Prometheus recorder and business counters
//! - [`logging`]: JSON or text tracing setup
//! - [`middleware`]: request IDs and HTTP metrics
//! - [`TripRequest`]: request body with validation
//!
//! Handlers stay thin. Geocoding, routing, planning and costing all live in
//! `haulplan-lib`; this crate only parses, validates, maps errors and
//! records observability data.
//!
//! Enable the `test-utils` feature for [`test_utils`], which builds an
//! [`AppState`] over in-memory collaborators.

mod health;
pub mod logging;
pub mod metrics;
pub mod middleware;
mod problem;
mod request;
mod response;
mod state;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use health::{health_live, health_ready, HealthStatus};
pub use logging::{init_logging, LogFormat, LoggingConfig};
pub use metrics::{
    init_metrics, metrics_handler, record_charging_stops, record_price_fallback,
    record_trip_failed, record_trip_planned, MetricsConfig, MetricsError,
};
pub use middleware::{extract_or_generate_request_id, track_requests, RequestId, REQUEST_ID_HEADER};
pub use problem::{
    failure_reason, from_lib_error, ProblemDetails, PROBLEM_INTERNAL_ERROR,
    PROBLEM_INVALID_REQUEST, PROBLEM_PLACE_NOT_FOUND, PROBLEM_SERVICE_UNAVAILABLE,
    PROBLEM_UPSTREAM_FAILURE,
};
pub use request::{TripRequest, Validate, MAX_TRIPS_PER_YEAR};
pub use response::ServiceResponse;
pub use state::{AppState, AppStateError};
