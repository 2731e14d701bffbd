//! Geographic points and great-circle distance.
//!
//! All feasibility decisions in the planner use [`haversine_miles`]. It is an
//! approximation of driving distance and is never reported as trip mileage;
//! reported mileage comes from a [`crate::RoadRouter`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Mean Earth radius in statute miles.
pub const EARTH_RADIUS_MILES: f64 = 3958.8;

/// Miles per metre, matching the conversion applied to road router output.
pub const MILES_PER_METER: f64 = 0.000621371;

/// Convert a distance in metres to miles.
pub fn meters_to_miles(meters: f64) -> f64 {
    meters * MILES_PER_METER
}

/// A latitude/longitude pair in decimal degrees.
///
/// Equality is exact coordinate equality.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Construct a point, rejecting non-finite or out-of-range coordinates.
    pub fn checked(lat: f64, lon: f64) -> Result<Self> {
        let point = Self { lat, lon };
        point.validate()?;
        Ok(point)
    }

    /// Validate that both coordinates are finite and within WGS84 bounds.
    pub fn validate(&self) -> Result<()> {
        if !self.lat.is_finite() || !self.lon.is_finite() {
            return Err(self.invalid("coordinates must be finite"));
        }
        if !(-90.0..=90.0).contains(&self.lat) {
            return Err(self.invalid("latitude must be between -90 and 90"));
        }
        if !(-180.0..=180.0).contains(&self.lon) {
            return Err(self.invalid("longitude must be between -180 and 180"));
        }
        Ok(())
    }

    /// Great-circle distance to another point in miles.
    pub fn distance_to(&self, other: &GeoPoint) -> f64 {
        haversine_miles(*self, *other)
    }

    /// Coordinates as `[lon, lat]`, the order expected by GeoJSON services.
    pub fn lon_lat(&self) -> [f64; 2] {
        [self.lon, self.lat]
    }

    fn invalid(&self, message: &str) -> Error {
        Error::InvalidCoordinate {
            lat: self.lat,
            lon: self.lon,
            message: message.to_string(),
        }
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4},{:.4}", self.lat, self.lon)
    }
}

/// Parses `"LAT,LON"`, with optional whitespace around either value.
impl FromStr for GeoPoint {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (lat, lon) = s.split_once(',').ok_or_else(|| {
            Error::invalid("coordinates", format!("expected LAT,LON but got '{s}'"))
        })?;
        let parse = |value: &str, name: &'static str| {
            value.trim().parse::<f64>().map_err(|err| {
                Error::invalid("coordinates", format!("invalid {name} '{}': {err}", value.trim()))
            })
        };
        GeoPoint::checked(parse(lat, "latitude")?, parse(lon, "longitude")?)
    }
}

/// Great-circle (haversine) distance between two points in miles.
pub fn haversine_miles(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlat = (b.lat - a.lat).to_radians();
    let dlon = (b.lon - a.lon).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    // Rounding can push h marginally above 1 for antipodal points.
    let c = 2.0 * h.sqrt().min(1.0).asin();

    EARTH_RADIUS_MILES * c
}
