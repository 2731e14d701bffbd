//! Request types and validation for HTTP endpoints.

use serde::{Deserialize, Serialize};

use haulplan_lib::{RouteAlgorithm, TripQuery};

use crate::ProblemDetails;

/// Upper bound on `trips_per_year` accepted by the API.
pub const MAX_TRIPS_PER_YEAR: u32 = 10_000;

/// Validation trait for request types.
pub trait Validate {
    /// Validate the request. The `request_id` populates the `instance` field
    /// of any returned problem; the problem is boxed to keep `Err` small.
    fn validate(&self, request_id: &str) -> Result<(), Box<ProblemDetails>>;
}

/// Body of `POST /api/v1/trip`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripRequest {
    /// Origin place name.
    pub from: String,

    /// Destination place name.
    pub to: String,

    /// One-way trips per year.
    #[serde(default = "default_trips_per_year")]
    pub trips_per_year: u32,

    /// Diesel economy in mpg; the default profile economy when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub economy: Option<f64>,

    /// Planning strategy; the service default when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub algorithm: Option<RouteAlgorithm>,
}

fn default_trips_per_year() -> u32 {
    1
}

impl TripRequest {
    /// Convert into the library query.
    pub fn to_query(&self) -> TripQuery {
        let mut query =
            TripQuery::new(self.from.trim(), self.to.trim()).with_trips(self.trips_per_year);
        if let Some(economy) = self.economy {
            query = query.with_economy(economy);
        }
        if let Some(algorithm) = self.algorithm {
            query = query.with_algorithm(algorithm);
        }
        query
    }
}

impl Validate for TripRequest {
    fn validate(&self, request_id: &str) -> Result<(), Box<ProblemDetails>> {
        if self.from.trim().is_empty() {
            return Err(Box::new(ProblemDetails::bad_request(
                "The 'from' field is required and cannot be empty",
                request_id,
            )));
        }

        if self.to.trim().is_empty() {
            return Err(Box::new(ProblemDetails::bad_request(
                "The 'to' field is required and cannot be empty",
                request_id,
            )));
        }

        if self.trips_per_year == 0 {
            return Err(Box::new(ProblemDetails::bad_request(
                "The 'trips_per_year' field must be at least 1",
                request_id,
            )));
        }

        if self.trips_per_year > MAX_TRIPS_PER_YEAR {
            return Err(Box::new(ProblemDetails::bad_request(
                format!("The 'trips_per_year' field cannot exceed {MAX_TRIPS_PER_YEAR}"),
                request_id,
            )));
        }

        if let Some(economy) = self.economy {
            if !economy.is_finite() || economy <= 0.0 {
                return Err(Box::new(ProblemDetails::bad_request(
                    "The 'economy' field must be a positive number",
                    request_id,
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(from: &str, to: &str) -> TripRequest {
        TripRequest {
            from: from.to_string(),
            to: to.to_string(),
            trips_per_year: 12,
            economy: Some(7.0),
            algorithm: None,
        }
    }

    #[test]
    fn test_trip_request_valid() {
        assert!(request("Los Angeles", "New York").validate("test").is_ok());
    }

    #[test]
    fn test_trip_request_empty_from() {
        let err = request("", "New York").validate("test").unwrap_err();
        assert!(err.detail.as_deref().unwrap().contains("'from'"));
        assert_eq!(err.instance.as_deref(), Some("test"));
    }

    #[test]
    fn test_trip_request_blank_to() {
        let err = request("Los Angeles", "   ").validate("test").unwrap_err();
        assert!(err.detail.as_deref().unwrap().contains("'to'"));
    }

    #[test]
    fn test_trip_request_zero_trips() {
        let mut req = request("Los Angeles", "New York");
        req.trips_per_year = 0;
        let err = req.validate("test").unwrap_err();
        assert!(err.detail.as_deref().unwrap().contains("at least 1"));
    }

    #[test]
    fn test_trip_request_too_many_trips() {
        let mut req = request("Los Angeles", "New York");
        req.trips_per_year = MAX_TRIPS_PER_YEAR + 1;
        let err = req.validate("test").unwrap_err();
        assert!(err.detail.as_deref().unwrap().contains("cannot exceed"));
    }

    #[test]
    fn test_trip_request_negative_economy() {
        let mut req = request("Los Angeles", "New York");
        req.economy = Some(-1.0);
        let err = req.validate("test").unwrap_err();
        assert!(err.detail.as_deref().unwrap().contains("'economy'"));
    }

    #[test]
    fn test_trip_request_deserialization_defaults() {
        let json = r#"{"from":"Denver","to":"Dallas"}"#;
        let req: TripRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.trips_per_year, 1);
        assert!(req.economy.is_none());
        assert!(req.algorithm.is_none());
    }

    #[test]
    fn test_trip_request_algorithm_deserialization() {
        let json = r#"{"from":"Denver","to":"Dallas","algorithm":"dijkstra"}"#;
        let req: TripRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.algorithm, Some(RouteAlgorithm::Dijkstra));
    }

    #[test]
    fn test_to_query_trims_and_copies_options() {
        let mut req = request("  Denver ", "Dallas");
        req.algorithm = Some(RouteAlgorithm::Dijkstra);
        let query = req.to_query();
        assert_eq!(query.from, "Denver");
        assert_eq!(query.trips_per_year, 12);
        assert_eq!(query.economy, Some(7.0));
        assert_eq!(query.algorithm, Some(RouteAlgorithm::Dijkstra));
    }
}
