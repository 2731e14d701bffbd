//! Shared fixtures and in-memory collaborators for integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use haulplan_lib::geo::MILES_PER_METER;
use haulplan_lib::{
    haversine_miles, ChargingNetwork, Error, GeoPoint, Geocoder, PriceSource, ResolvedPlace,
    Result, RoadLeg, RoadProfile, RoadRouter,
};

pub const LOS_ANGELES: GeoPoint = GeoPoint::new(34.05, -118.25);
pub const NEW_YORK: GeoPoint = GeoPoint::new(40.71, -74.00);

/// Path to fixtures directory used by tests.
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../docs/fixtures")
}

/// Corridor network with a charger roughly every 175 miles between Los
/// Angeles and New York, plus off-corridor cities.
pub fn corridor_network() -> ChargingNetwork {
    ChargingNetwork::from_path(&fixtures_dir().join("charging_stations.csv"))
        .expect("load fixture charging_stations.csv")
}

/// Geocoder backed by a fixed table, counting lookups.
#[derive(Default)]
pub struct StaticGeocoder {
    places: HashMap<String, ResolvedPlace>,
    calls: AtomicUsize,
}

impl StaticGeocoder {
    pub fn with(mut self, query: &str, label: &str, point: GeoPoint) -> Self {
        self.places
            .insert(query.to_string(), ResolvedPlace::new(label, point));
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Geocoder for StaticGeocoder {
    fn geocode(&self, query: &str) -> Result<Option<ResolvedPlace>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.places.get(query).cloned())
    }
}

/// Router returning great-circle distance times `factor`, recording the
/// profile of every call. Fails every call using `fail_on`, if set.
pub struct ScaledRouter {
    factor: f64,
    fail_on: Option<RoadProfile>,
    calls: Mutex<Vec<RoadProfile>>,
}

impl ScaledRouter {
    pub fn new(factor: f64) -> Self {
        Self {
            factor,
            fail_on: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_on(mut self, profile: RoadProfile) -> Self {
        self.fail_on = Some(profile);
        self
    }

    pub fn calls(&self) -> Vec<RoadProfile> {
        self.calls.lock().unwrap().clone()
    }
}

impl RoadRouter for ScaledRouter {
    fn route(&self, from: GeoPoint, to: GeoPoint, profile: RoadProfile) -> Result<RoadLeg> {
        self.calls.lock().unwrap().push(profile);
        if self.fail_on == Some(profile) {
            return Err(Error::Routing {
                message: format!("{profile} unavailable"),
            });
        }
        let miles = haversine_miles(from, to) * self.factor;
        Ok(RoadLeg {
            distance_meters: miles / MILES_PER_METER,
            geometry: vec![from, to],
        })
    }
}

/// Price source that always fails.
pub struct UnavailablePrice;

impl PriceSource for UnavailablePrice {
    fn diesel_price_per_gallon(&self) -> Result<f64> {
        Err(Error::PriceLookup {
            message: "feed offline".to_string(),
        })
    }
}
