//! RFC 9457 Problem Details for HTTP APIs.
//!
//! See: <https://www.rfc-editor.org/rfc/rfc9457.html>

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use haulplan_lib::Error as LibError;

/// Problem type URI for invalid request parameters.
pub const PROBLEM_INVALID_REQUEST: &str = "/problems/invalid-request";

/// Problem type URI for place names the geocoder cannot resolve.
pub const PROBLEM_PLACE_NOT_FOUND: &str = "/problems/place-not-found";

/// Problem type URI for failures of the geocoding or road routing services.
pub const PROBLEM_UPSTREAM_FAILURE: &str = "/problems/upstream-failure";

/// Problem type URI for internal server errors.
pub const PROBLEM_INTERNAL_ERROR: &str = "/problems/internal-error";

/// Problem type URI for service unavailable (e.g., no station data).
pub const PROBLEM_SERVICE_UNAVAILABLE: &str = "/problems/service-unavailable";

/// RFC 9457 Problem Details response structure.
///
/// ```
/// use haulplan_service_shared::{ProblemDetails, PROBLEM_PLACE_NOT_FOUND};
/// use axum::http::StatusCode;
///
/// let problem = ProblemDetails::new(
///     PROBLEM_PLACE_NOT_FOUND,
///     "Place Not Found",
///     StatusCode::NOT_FOUND,
/// )
/// .with_detail("No match for 'Atlantis'")
/// .with_request_id("req-12345");
/// assert_eq!(problem.status, 404);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProblemDetails {
    /// URI reference identifying the problem type (relative).
    #[serde(rename = "type")]
    pub type_uri: String,

    pub title: String,

    pub status: u16,

    /// Human-readable explanation specific to this occurrence.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,

    /// Request ID of the failed call.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,

    /// Always "application/problem+json".
    pub content_type: String,
}

impl ProblemDetails {
    pub fn new(type_uri: impl Into<String>, title: impl Into<String>, status: StatusCode) -> Self {
        Self {
            type_uri: type_uri.into(),
            title: title.into(),
            status: status.as_u16(),
            detail: None,
            instance: None,
            content_type: "application/problem+json".to_string(),
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.instance = Some(request_id.into());
        self
    }

    /// 400 Bad Request for invalid input.
    pub fn bad_request(detail: impl Into<String>, request_id: impl Into<String>) -> Self {
        Self::new(
            PROBLEM_INVALID_REQUEST,
            "Invalid Request",
            StatusCode::BAD_REQUEST,
        )
        .with_detail(detail)
        .with_request_id(request_id)
    }

    /// 404 Not Found for a place name with no geocoder match.
    pub fn place_not_found(query: &str, request_id: impl Into<String>) -> Self {
        Self::new(
            PROBLEM_PLACE_NOT_FOUND,
            "Place Not Found",
            StatusCode::NOT_FOUND,
        )
        .with_detail(format!("No location found for '{}'", query))
        .with_request_id(request_id)
    }

    /// 502 Bad Gateway for a failed geocoding or road routing call.
    pub fn upstream_failure(detail: impl Into<String>, request_id: impl Into<String>) -> Self {
        Self::new(
            PROBLEM_UPSTREAM_FAILURE,
            "Upstream Service Failure",
            StatusCode::BAD_GATEWAY,
        )
        .with_detail(detail)
        .with_request_id(request_id)
    }

    /// 500 Internal Server Error.
    pub fn internal_error(detail: impl Into<String>, request_id: impl Into<String>) -> Self {
        Self::new(
            PROBLEM_INTERNAL_ERROR,
            "Internal Error",
            StatusCode::INTERNAL_SERVER_ERROR,
        )
        .with_detail(detail)
        .with_request_id(request_id)
    }

    /// 503 Service Unavailable.
    pub fn service_unavailable(detail: impl Into<String>, request_id: impl Into<String>) -> Self {
        Self::new(
            PROBLEM_SERVICE_UNAVAILABLE,
            "Service Unavailable",
            StatusCode::SERVICE_UNAVAILABLE,
        )
        .with_detail(detail)
        .with_request_id(request_id)
    }
}

impl std::fmt::Display for ProblemDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {}",
            self.title,
            self.detail.as_deref().unwrap_or("")
        )
    }
}

impl std::error::Error for ProblemDetails {}

impl IntoResponse for ProblemDetails {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let mut response = Json(&self).into_response();
        response.headers_mut().insert(
            axum::http::header::CONTENT_TYPE,
            axum::http::HeaderValue::from_static("application/problem+json"),
        );
        *response.status_mut() = status;
        response
    }
}

/// Convert library errors to ProblemDetails.
///
/// Input errors map to 400, unknown places to 404 and collaborator failures
/// to 502. Anything else is a 500.
pub fn from_lib_error(error: &LibError, request_id: &str) -> ProblemDetails {
    match error {
        LibError::InvalidParameter { .. } | LibError::InvalidCoordinate { .. } => {
            ProblemDetails::bad_request(error.to_string(), request_id)
        }
        LibError::PlaceNotFound { query } => ProblemDetails::place_not_found(query, request_id),
        LibError::NetworkDataNotFound { path } => ProblemDetails::service_unavailable(
            format!("Charging station data not available at {}", path.display()),
            request_id,
        ),
        e if e.is_upstream() => ProblemDetails::upstream_failure(error.to_string(), request_id),
        _ => ProblemDetails::internal_error(error.to_string(), request_id),
    }
}

/// Metric label describing why a trip request failed.
pub fn failure_reason(error: &LibError) -> &'static str {
    match error {
        LibError::InvalidParameter { .. } | LibError::InvalidCoordinate { .. } => {
            "validation_error"
        }
        LibError::PlaceNotFound { .. } => "place_not_found",
        LibError::Geocoding { .. } => "geocoding_failed",
        LibError::Routing { .. } => "routing_failed",
        e if e.is_upstream() => "upstream_error",
        _ => "internal_error",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_problem_details_new() {
        let problem = ProblemDetails::new(
            PROBLEM_PLACE_NOT_FOUND,
            "Place Not Found",
            StatusCode::NOT_FOUND,
        );
        assert_eq!(problem.type_uri, PROBLEM_PLACE_NOT_FOUND);
        assert_eq!(problem.status, 404);
        assert_eq!(problem.content_type, "application/problem+json");
    }

    #[test]
    fn test_problem_details_serialization() {
        let problem = ProblemDetails::bad_request("Test error", "req-test");
        let json = serde_json::to_string(&problem).unwrap();

        assert!(json.contains("\"type\":\"/problems/invalid-request\""));
        assert!(json.contains("\"title\":\"Invalid Request\""));
        assert!(json.contains("\"status\":400"));
        assert!(json.contains("\"detail\":\"Test error\""));
        assert!(json.contains("\"instance\":\"req-test\""));
    }

    #[test]
    fn test_problem_details_into_response_sets_content_type() {
        let response = ProblemDetails::upstream_failure("ORS timed out", "req-1").into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(
            response.headers()[axum::http::header::CONTENT_TYPE],
            "application/problem+json"
        );
    }

    #[test]
    fn test_from_lib_error_invalid_parameter() {
        let error = LibError::InvalidParameter {
            parameter: "trips",
            message: "must be at least 1".to_string(),
        };
        let problem = from_lib_error(&error, "req-lib");
        assert_eq!(problem.status, 400);
        assert!(problem.detail.as_deref().unwrap().contains("trips"));
        assert_eq!(failure_reason(&error), "validation_error");
    }

    #[test]
    fn test_from_lib_error_place_not_found() {
        let error = LibError::PlaceNotFound {
            query: "Atlantis".to_string(),
        };
        let problem = from_lib_error(&error, "req-place");
        assert_eq!(problem.type_uri, PROBLEM_PLACE_NOT_FOUND);
        assert_eq!(problem.status, 404);
        assert!(problem.detail.as_deref().unwrap().contains("Atlantis"));
    }

    #[test]
    fn test_from_lib_error_routing_is_bad_gateway() {
        let error = LibError::Routing {
            message: "HTTP 503".to_string(),
        };
        let problem = from_lib_error(&error, "req-route");
        assert_eq!(problem.type_uri, PROBLEM_UPSTREAM_FAILURE);
        assert_eq!(problem.status, 502);
        assert_eq!(failure_reason(&error), "routing_failed");
    }

    #[test]
    fn test_from_lib_error_network_validation_is_internal() {
        let error = LibError::NetworkDataValidation {
            message: "no coordinate columns".to_string(),
        };
        assert_eq!(from_lib_error(&error, "req").status, 500);
        assert_eq!(failure_reason(&error), "internal_error");
    }
}
