use std::sync::Mutex;
use std::thread;
use std::time::{Duration, Instant};

use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::error::{Error, Result};
use crate::geo::GeoPoint;

use super::{RoadLeg, RoadProfile, RoadRouter, USER_AGENT};

pub const DEFAULT_ORS_BASE_URL: &str = "https://api.openrouteservice.org";
/// Minimum spacing between calls, keeping bursts under the free-tier quota.
pub const DEFAULT_ORS_MIN_INTERVAL: Duration = Duration::from_millis(1500);
const ROUTE_TIMEOUT: Duration = Duration::from_secs(30);

/// Blocking client for the OpenRouteService directions API.
///
/// Calls through one client are serialized and spaced at least
/// `min_interval` apart.
#[derive(Debug)]
pub struct OpenRouteServiceRouter {
    client: Client,
    base_url: String,
    api_key: String,
    min_interval: Duration,
    last_call: Mutex<Option<Instant>>,
}

#[derive(Debug, Deserialize)]
struct DirectionsResponse {
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    properties: Properties,
    #[serde(default)]
    geometry: Option<Geometry>,
}

#[derive(Debug, Deserialize)]
struct Properties {
    #[serde(default)]
    summary: Option<Summary>,
    #[serde(default)]
    segments: Vec<Summary>,
}

#[derive(Debug, Deserialize)]
struct Summary {
    #[serde(default)]
    distance: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    #[serde(default)]
    coordinates: Vec<[f64; 2]>,
}

impl OpenRouteServiceRouter {
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_base_url(api_key, DEFAULT_ORS_BASE_URL)
    }

    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(ROUTE_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            min_interval: DEFAULT_ORS_MIN_INTERVAL,
            last_call: Mutex::new(None),
        })
    }

    pub fn with_min_interval(mut self, min_interval: Duration) -> Self {
        self.min_interval = min_interval;
        self
    }

    fn throttle(&self, last_call: &mut Option<Instant>) {
        if let Some(previous) = *last_call {
            let elapsed = previous.elapsed();
            if elapsed < self.min_interval {
                thread::sleep(self.min_interval - elapsed);
            }
        }
        *last_call = Some(Instant::now());
    }
}

impl RoadRouter for OpenRouteServiceRouter {
    fn route(&self, from: GeoPoint, to: GeoPoint, profile: RoadProfile) -> Result<RoadLeg> {
        let mut last_call = self.last_call.lock().map_err(|_| Error::Routing {
            message: "router throttle lock poisoned".to_string(),
        })?;
        self.throttle(&mut last_call);

        let url = format!("{}/v2/directions/{}/geojson", self.base_url, profile.ors_name());
        debug!(%from, %to, %profile, "requesting road route");

        let response = self
            .client
            .post(&url)
            .header(AUTHORIZATION, &self.api_key)
            .header(ACCEPT, "application/geo+json, application/json")
            .json(&json!({ "coordinates": [from.lon_lat(), to.lon_lat()] }))
            .send()?;

        let status = response.status();
        let body = response.text()?;
        if !status.is_success() {
            return Err(Error::Routing {
                message: format!("{profile} route {from} -> {to} returned {status}: {body}"),
            });
        }
        parse_directions(&body)
    }
}

fn parse_directions(body: &str) -> Result<RoadLeg> {
    let response: DirectionsResponse = serde_json::from_str(body).map_err(|e| Error::Routing {
        message: format!("malformed directions response: {e}"),
    })?;
    let feature = response.features.into_iter().next().ok_or_else(|| Error::Routing {
        message: "directions response contained no route".to_string(),
    })?;

    let distance_meters = feature
        .properties
        .summary
        .and_then(|s| s.distance)
        .or_else(|| {
            let segments = &feature.properties.segments;
            (!segments.is_empty()).then(|| segments.iter().filter_map(|s| s.distance).sum::<f64>())
        })
        .ok_or_else(|| Error::Routing {
            message: "directions response had no distance".to_string(),
        })?;

    if !distance_meters.is_finite() || distance_meters < 0.0 {
        return Err(Error::Routing {
            message: format!("invalid route distance {distance_meters}"),
        });
    }

    let geometry = feature
        .geometry
        .map(|g| {
            g.coordinates
                .into_iter()
                .map(|[lon, lat]| GeoPoint::new(lat, lon))
                .collect()
        })
        .unwrap_or_default();

    Ok(RoadLeg {
        distance_meters,
        geometry,
    })
}
