//! Collaborators that live outside the process: geocoding, road routing and
//! the diesel price feed.
//!
//! Each collaborator is a trait so the orchestration in [`crate::service`] can
//! run against the real HTTP clients or against in-memory fakes. None of the
//! clients retry; a failed call surfaces as an [`crate::Error`].

mod config;
mod geocoder;
mod label;
mod price;
mod road_router;

use std::fmt;

use serde::Serialize;

use crate::error::Result;
use crate::geo::GeoPoint;

pub use config::ExternalConfig;
pub use geocoder::{NominatimGeocoder, DEFAULT_NOMINATIM_BASE_URL};
pub use label::{state_abbreviation, AddressParts};
pub use price::{
    EiaDieselPrice, FixedPrice, UnconfiguredPrice, DEFAULT_EIA_BASE_URL, EIA_DIESEL_SERIES,
};
pub use road_router::{OpenRouteServiceRouter, DEFAULT_ORS_BASE_URL, DEFAULT_ORS_MIN_INTERVAL};

/// User agent sent with every outbound request.
pub const USER_AGENT: &str = concat!("haulplan/", env!("CARGO_PKG_VERSION"));

/// A geocoded place: display label and coordinates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedPlace {
    pub label: String,
    pub point: GeoPoint,
}

impl ResolvedPlace {
    pub fn new(label: impl Into<String>, point: GeoPoint) -> Self {
        Self {
            label: label.into(),
            point,
        }
    }
}

/// Resolves free-text place names to coordinates.
pub trait Geocoder: Send + Sync {
    /// Returns `Ok(None)` when the service has no match for `query`.
    fn geocode(&self, query: &str) -> Result<Option<ResolvedPlace>>;
}

/// Vehicle profile used for a road routing call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RoadProfile {
    /// Heavy goods vehicle, used for the diesel leg.
    HeavyGoods,
    /// Passenger car, used for electric legs between chargers.
    Car,
}

impl RoadProfile {
    /// OpenRouteService profile identifier.
    pub fn ors_name(self) -> &'static str {
        match self {
            RoadProfile::HeavyGoods => "driving-hgv",
            RoadProfile::Car => "driving-car",
        }
    }
}

impl fmt::Display for RoadProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.ors_name())
    }
}

/// A single routed road leg.
#[derive(Debug, Clone, PartialEq)]
pub struct RoadLeg {
    pub distance_meters: f64,
    pub geometry: Vec<GeoPoint>,
}

/// Computes road distance between two points.
pub trait RoadRouter: Send + Sync {
    fn route(&self, from: GeoPoint, to: GeoPoint, profile: RoadProfile) -> Result<RoadLeg>;
}

/// Supplies the current diesel pump price.
pub trait PriceSource: Send + Sync {
    /// US average retail diesel price in dollars per gallon.
    fn diesel_price_per_gallon(&self) -> Result<f64>;
}

impl<T: Geocoder + ?Sized> Geocoder for std::sync::Arc<T> {
    fn geocode(&self, query: &str) -> Result<Option<ResolvedPlace>> {
        (**self).geocode(query)
    }
}

impl<T: RoadRouter + ?Sized> RoadRouter for std::sync::Arc<T> {
    fn route(&self, from: GeoPoint, to: GeoPoint, profile: RoadProfile) -> Result<RoadLeg> {
        (**self).route(from, to, profile)
    }
}

impl<T: PriceSource + ?Sized> PriceSource for std::sync::Arc<T> {
    fn diesel_price_per_gallon(&self) -> Result<f64> {
        (**self).diesel_price_per_gallon()
    }
}
