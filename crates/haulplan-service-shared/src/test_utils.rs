//! Test fixtures for handler testing: the fixture charging network plus
//! in-memory geocoder, road router and price collaborators.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};

use haulplan_lib::geo::MILES_PER_METER;
use haulplan_lib::{
    haversine_miles, ChargingNetwork, Error, FixedPrice, GeoPoint, Geocoder, PlanningContext,
    PriceSource, ResolvedPlace, Result, RoadLeg, RoadProfile, RoadRouter, ServiceConfig,
};

use crate::state::AppState;

/// Path to the fixture charging station file.
pub const TEST_STATIONS_PATH: &str = concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../../docs/fixtures/charging_stations.csv"
);

/// Diesel price reported by [`test_state`].
pub const TEST_DIESEL_PRICE: f64 = 4.0;

/// Road distance as a multiple of great-circle distance in [`test_state`].
pub const TEST_ROAD_FACTOR: f64 = 1.2;

static TEST_STATE: OnceLock<AppState> = OnceLock::new();

pub fn fixture_stations_path() -> PathBuf {
    PathBuf::from(TEST_STATIONS_PATH)
}

/// Place names understood by [`fixture_geocoder`].
pub mod fixture_places {
    use haulplan_lib::GeoPoint;

    pub const LOS_ANGELES: &str = "Los Angeles";
    pub const NEW_YORK: &str = "New York";
    pub const DENVER: &str = "Denver";
    /// About 75 miles east of Denver, inside one leg.
    pub const LIMON: &str = "Limon";
    /// Not known to the geocoder.
    pub const ATLANTIS: &str = "Atlantis";
    /// The geocoder fails for this query.
    pub const UNREACHABLE: &str = "Unreachable";

    pub const LOS_ANGELES_POINT: GeoPoint = GeoPoint::new(34.05, -118.25);
    pub const NEW_YORK_POINT: GeoPoint = GeoPoint::new(40.71, -74.00);
    pub const DENVER_POINT: GeoPoint = GeoPoint::new(39.7392, -104.9903);
    pub const LIMON_POINT: GeoPoint = GeoPoint::new(39.2639, -103.6922);
}

/// Geocoder over a fixed table, counting calls.
#[derive(Default)]
pub struct MockGeocoder {
    places: HashMap<String, ResolvedPlace>,
    failing: Vec<String>,
    calls: AtomicUsize,
}

impl MockGeocoder {
    pub fn with_place(mut self, query: &str, label: &str, point: GeoPoint) -> Self {
        self.places
            .insert(query.to_lowercase(), ResolvedPlace::new(label, point));
        self
    }

    pub fn failing_on(mut self, query: &str) -> Self {
        self.failing.push(query.to_lowercase());
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Geocoder for MockGeocoder {
    fn geocode(&self, query: &str) -> Result<Option<ResolvedPlace>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let key = query.trim().to_lowercase();
        if self.failing.contains(&key) {
            return Err(Error::Geocoding {
                query: query.to_string(),
                message: "HTTP 503 Service Unavailable".to_string(),
            });
        }
        Ok(self.places.get(&key).cloned())
    }
}

/// Geocoder with every [`fixture_places`] entry.
pub fn fixture_geocoder() -> MockGeocoder {
    use fixture_places::*;
    MockGeocoder::default()
        .with_place(LOS_ANGELES, "Los Angeles, CA", LOS_ANGELES_POINT)
        .with_place(NEW_YORK, "New York, NY", NEW_YORK_POINT)
        .with_place(DENVER, "Denver, CO", DENVER_POINT)
        .with_place(LIMON, "Limon, CO", LIMON_POINT)
        .failing_on(UNREACHABLE)
}

/// Road router returning great-circle distance scaled by a factor.
pub struct StraightLineRouter {
    factor: f64,
    failing_profile: Option<RoadProfile>,
    calls: AtomicUsize,
}

impl StraightLineRouter {
    pub fn new(factor: f64) -> Self {
        Self {
            factor,
            failing_profile: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Fail every call made with `profile`.
    pub fn failing_on(mut self, profile: RoadProfile) -> Self {
        self.failing_profile = Some(profile);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl RoadRouter for StraightLineRouter {
    fn route(&self, from: GeoPoint, to: GeoPoint, profile: RoadProfile) -> Result<RoadLeg> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing_profile == Some(profile) {
            return Err(Error::Routing {
                message: format!("{profile} directions returned HTTP 500"),
            });
        }
        Ok(RoadLeg {
            distance_meters: haversine_miles(from, to) * self.factor / MILES_PER_METER,
            geometry: vec![from, to],
        })
    }
}

/// Price source that always fails, forcing the fallback price.
pub struct UnavailablePrice;

impl PriceSource for UnavailablePrice {
    fn diesel_price_per_gallon(&self) -> Result<f64> {
        Err(Error::PriceLookup {
            message: "feed offline".to_string(),
        })
    }
}

pub fn fixture_network() -> ChargingNetwork {
    let path = fixture_stations_path();
    ChargingNetwork::from_path(&path)
        .unwrap_or_else(|e| panic!("failed to load test fixture from {:?}: {}", path, e))
}

/// Shared state over the fixture network, [`fixture_geocoder`], a
/// [`StraightLineRouter`] with [`TEST_ROAD_FACTOR`] and a fixed price of
/// [`TEST_DIESEL_PRICE`]. Built once and cloned on later calls.
pub fn test_state() -> AppState {
    TEST_STATE
        .get_or_init(|| {
            test_state_with(
                Arc::new(StraightLineRouter::new(TEST_ROAD_FACTOR)),
                Arc::new(FixedPrice(TEST_DIESEL_PRICE)),
            )
        })
        .clone()
}

/// Fresh state over the fixture network with the given router and price.
pub fn test_state_with(router: Arc<dyn RoadRouter>, price: Arc<dyn PriceSource>) -> AppState {
    AppState::from_components(
        PlanningContext::new(fixture_network()),
        Arc::new(fixture_geocoder()),
        router,
        price,
        ServiceConfig::default(),
    )
}

/// State with no charging stations; readiness reports 503.
pub fn empty_state() -> AppState {
    AppState::from_components(
        PlanningContext::new(ChargingNetwork::default()),
        Arc::new(fixture_geocoder()),
        Arc::new(StraightLineRouter::new(TEST_ROAD_FACTOR)),
        Arc::new(FixedPrice(TEST_DIESEL_PRICE)),
        ServiceConfig::default(),
    )
}

static REQUEST_COUNTER: AtomicUsize = AtomicUsize::new(0);

/// Unique request ID for tests.
pub fn test_request_id() -> String {
    format!("test-{}", REQUEST_COUNTER.fetch_add(1, Ordering::SeqCst))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_path_exists() {
        assert!(fixture_stations_path().exists());
    }

    #[test]
    fn test_state_loads_fixture_network() {
        assert_eq!(test_state().network().len(), 19);
    }

    #[test]
    fn test_fixture_geocoder_knows_places() {
        let geocoder = fixture_geocoder();
        let place = geocoder.geocode(" new york ").unwrap().unwrap();
        assert_eq!(place.label, "New York, NY");
        assert!(geocoder.geocode(fixture_places::ATLANTIS).unwrap().is_none());
        assert!(geocoder.geocode(fixture_places::UNREACHABLE).is_err());
        assert_eq!(geocoder.calls(), 3);
    }

    #[test]
    fn test_straight_line_router_scales_distance() {
        let router = StraightLineRouter::new(2.0);
        let from = GeoPoint::new(0.0, 0.0);
        let to = GeoPoint::new(0.0, 1.0);
        let leg = router.route(from, to, RoadProfile::Car).unwrap();
        let miles = leg.distance_meters * MILES_PER_METER;
        assert!((miles - 2.0 * haversine_miles(from, to)).abs() < 1e-6);
        assert!(router
            .failing_on(RoadProfile::Car)
            .route(from, to, RoadProfile::Car)
            .is_err());
    }

    #[test]
    fn test_request_id_unique() {
        assert_ne!(test_request_id(), test_request_id());
    }
}
