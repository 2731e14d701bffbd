use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::geo::GeoPoint;

use super::label::AddressParts;
use super::{Geocoder, ResolvedPlace, USER_AGENT};

pub const DEFAULT_NOMINATIM_BASE_URL: &str = "https://nominatim.openstreetmap.org";
const GEOCODE_TIMEOUT: Duration = Duration::from_secs(10);

/// Blocking client for the Nominatim search API.
#[derive(Debug, Clone)]
pub struct NominatimGeocoder {
    client: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    lat: String,
    lon: String,
    #[serde(default)]
    display_name: String,
    #[serde(default)]
    address: AddressParts,
}

impl NominatimGeocoder {
    pub fn new() -> Result<Self> {
        Self::with_base_url(DEFAULT_NOMINATIM_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(GEOCODE_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }
}

impl Geocoder for NominatimGeocoder {
    fn geocode(&self, query: &str) -> Result<Option<ResolvedPlace>> {
        let url = format!("{}/search", self.base_url);
        debug!(query, "geocoding place");

        let response = self
            .client
            .get(&url)
            .header(ACCEPT, "application/json")
            .query(&[
                ("q", query),
                ("format", "jsonv2"),
                ("addressdetails", "1"),
                ("limit", "1"),
            ])
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Geocoding {
                query: query.to_string(),
                message: format!("unexpected status {status}"),
            });
        }

        let body = response.text()?;
        parse_search_response(query, &body)
    }
}

fn parse_search_response(query: &str, body: &str) -> Result<Option<ResolvedPlace>> {
    let hits: Vec<SearchHit> = serde_json::from_str(body).map_err(|e| Error::Geocoding {
        query: query.to_string(),
        message: format!("malformed response: {e}"),
    })?;
    let Some(hit) = hits.into_iter().next() else {
        return Ok(None);
    };

    let coordinate = |value: &str| {
        value.trim().parse::<f64>().map_err(|_| Error::Geocoding {
            query: query.to_string(),
            message: format!("non-numeric coordinate '{value}'"),
        })
    };
    let point = GeoPoint::checked(coordinate(&hit.lat)?, coordinate(&hit.lon)?)?;
    let label = hit.address.label(&hit.display_name);
    Ok(Some(ResolvedPlace::new(label, point)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_first_hit() {
        let body = r#"[{
            "lat": "39.7392364",
            "lon": "-104.984862",
            "display_name": "Denver, Denver County, Colorado, United States",
            "address": {"city": "Denver", "state": "Colorado", "country": "United States"}
        }]"#;
        let place = parse_search_response("denver", body).unwrap().unwrap();
        assert_eq!(place.label, "Denver, CO");
        assert!((place.point.lat - 39.7392364).abs() < 1e-9);
        assert!((place.point.lon + 104.984862).abs() < 1e-9);
    }

    #[test]
    fn empty_result_is_none() {
        assert!(parse_search_response("nowhere", "[]").unwrap().is_none());
    }

    #[test]
    fn malformed_body_is_geocoding_error() {
        let err = parse_search_response("x", "{").unwrap_err();
        assert!(matches!(err, Error::Geocoding { .. }));
    }

    #[test]
    fn bad_coordinate_is_geocoding_error() {
        let body = r#"[{"lat": "north", "lon": "1.0"}]"#;
        let err = parse_search_response("x", body).unwrap_err();
        assert!(matches!(err, Error::Geocoding { .. }));
    }
}
