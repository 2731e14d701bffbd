use std::path::PathBuf;

use thiserror::Error;

/// Convenient result alias for the haulplan library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
///
/// An infeasible electric route is not an error; see [`crate::RoutePlan::feasible`].
#[derive(Debug, Error)]
pub enum Error {
    /// Raised when a planner or estimator input is outside its valid domain.
    #[error("invalid parameter {parameter}: {message}")]
    InvalidParameter {
        parameter: &'static str,
        message: String,
    },

    /// Raised when a coordinate pair is non-finite or out of range.
    #[error("invalid coordinate ({lat}, {lon}): {message}")]
    InvalidCoordinate { lat: f64, lon: f64, message: String },

    /// Raised when charging network data cannot be interpreted at all.
    #[error("invalid charging network data: {message}")]
    NetworkDataValidation { message: String },

    /// Raised when a charging network source file does not exist.
    #[error("charging network data not found at {path}")]
    NetworkDataNotFound { path: PathBuf },

    /// Raised when the geocoder has no match for a place name.
    #[error("place not found: {query}")]
    PlaceNotFound { query: String },

    /// Raised when the geocoding service returned an unusable response.
    #[error("geocoding failed for '{query}': {message}")]
    Geocoding { query: String, message: String },

    /// Raised when the road routing service failed for a leg.
    #[error("road routing failed: {message}")]
    Routing { message: String },

    /// Raised when the diesel price feed returned an unusable response.
    #[error("price lookup failed: {message}")]
    PriceLookup { message: String },

    /// Wrapper for IO errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Wrapper for CSV parsing errors.
    #[error(transparent)]
    Csv(#[from] csv::Error),

    /// Wrapper for HTTP client errors.
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// Wrapper for JSON decoding errors.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn invalid(parameter: &'static str, message: impl Into<String>) -> Self {
        Error::InvalidParameter {
            parameter,
            message: message.into(),
        }
    }

    /// Whether this error originated in an upstream collaborator (geocoder,
    /// road router, price feed, HTTP transport).
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            Error::Geocoding { .. }
                | Error::Routing { .. }
                | Error::PriceLookup { .. }
                | Error::Http(_)
        )
    }
}
