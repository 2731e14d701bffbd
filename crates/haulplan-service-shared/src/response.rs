//! Response wrapper for successful HTTP responses.

use axum::{
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Success body with a `content_type` field alongside the flattened payload,
/// mirroring [`crate::ProblemDetails`].
///
/// ```
/// use haulplan_service_shared::ServiceResponse;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Comparison {
///     diesel_total: f64,
///     electric_total: f64,
/// }
///
/// let response = ServiceResponse::new(Comparison { diesel_total: 1.0, electric_total: 0.5 });
/// assert_eq!(response.content_type, "application/json");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceResponse<T> {
    #[serde(flatten)]
    pub data: T,

    pub content_type: String,
}

impl<T> ServiceResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            content_type: "application/json".to_string(),
        }
    }
}

impl<T> From<T> for ServiceResponse<T> {
    fn from(data: T) -> Self {
        Self::new(data)
    }
}

impl<T: Serialize> IntoResponse for ServiceResponse<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
    struct LegSummary {
        stops: usize,
        road_miles: f64,
    }

    #[test]
    fn test_payload_fields_are_flattened() {
        let response = ServiceResponse::new(LegSummary {
            stops: 3,
            road_miles: 412.5,
        });
        let json = serde_json::to_string(&response).unwrap();

        assert!(json.contains("\"stops\":3"));
        assert!(json.contains("\"road_miles\":412.5"));
        assert!(json.contains("\"content_type\":\"application/json\""));
        assert!(!json.contains("\"data\""));
    }

    #[test]
    fn test_response_round_trips_payload() {
        let json = r#"{"stops":1,"road_miles":10.0,"content_type":"application/json"}"#;
        let response: ServiceResponse<LegSummary> = serde_json::from_str(json).unwrap();
        assert_eq!(
            response.data,
            LegSummary {
                stops: 1,
                road_miles: 10.0
            }
        );
    }
}
