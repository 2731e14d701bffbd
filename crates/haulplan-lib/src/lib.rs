//! haulplan library entry points.
//!
//! This crate loads a static charging network, plans range-constrained
//! electric routes through it, estimates annual operating cost and emissions
//! for diesel and electric tractors, and orchestrates the external geocoding,
//! road routing and price services for a full trip comparison. The CLI and
//! the HTTP service should only depend on the items exported here instead of
//! reimplementing behavior.

pub mod context;
pub mod cost;
pub mod error;
pub mod external;
pub mod geo;
pub mod network;
pub mod output;
pub mod routing;
pub mod service;

pub use context::{GeocodeCache, PlanningContext};
pub use cost::{estimate, CostProfile, PropulsionKind, TripCostResult};
pub use error::{Error, Result};
pub use external::{
    EiaDieselPrice, ExternalConfig, FixedPrice, Geocoder, NominatimGeocoder, OpenRouteServiceRouter,
    PriceSource, ResolvedPlace, RoadLeg, RoadProfile, RoadRouter, UnconfiguredPrice,
};
pub use geo::{haversine_miles, GeoPoint};
pub use network::{ChargingFacility, ChargingNetwork, FacilityId, LoadReport};
pub use output::{PlanSummary, RenderMode};
pub use routing::{
    plan, plan_route, RouteAlgorithm, RoutePlan, RouteRequest, DEFAULT_MAX_LEG_MILES,
};
pub use service::{
    DieselOutcome, DieselPrice, ElectricOutcome, PriceProvenance, RoutePlanningService,
    RoutedLeg, ServiceConfig, TripQuery, TripReport,
};
