use std::env;
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::error::{Error, Result};

use super::{
    EiaDieselPrice, Geocoder, NominatimGeocoder, OpenRouteServiceRouter, PriceSource,
    RoadRouter, UnconfiguredPrice, DEFAULT_NOMINATIM_BASE_URL, DEFAULT_ORS_BASE_URL,
    DEFAULT_ORS_MIN_INTERVAL,
};

pub const ORS_API_KEY_ENV: &str = "ORS_API_KEY";
pub const ORS_BASE_URL_ENV: &str = "ORS_BASE_URL";
pub const NOMINATIM_BASE_URL_ENV: &str = "NOMINATIM_BASE_URL";
pub const EIA_API_KEY_ENV: &str = "EIA_API_KEY";

/// Connection settings for the external collaborators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalConfig {
    pub ors_api_key: Option<String>,
    pub ors_base_url: String,
    pub ors_min_interval: Duration,
    pub nominatim_base_url: String,
    pub eia_api_key: Option<String>,
}

impl Default for ExternalConfig {
    fn default() -> Self {
        Self {
            ors_api_key: None,
            ors_base_url: DEFAULT_ORS_BASE_URL.to_string(),
            ors_min_interval: DEFAULT_ORS_MIN_INTERVAL,
            nominatim_base_url: DEFAULT_NOMINATIM_BASE_URL.to_string(),
            eia_api_key: None,
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl ExternalConfig {
    /// Read settings from `ORS_API_KEY`, `ORS_BASE_URL`, `NOMINATIM_BASE_URL`
    /// and `EIA_API_KEY`. Unset or blank variables keep their defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            ors_api_key: non_empty_var(ORS_API_KEY_ENV),
            ors_base_url: non_empty_var(ORS_BASE_URL_ENV).unwrap_or(defaults.ors_base_url),
            ors_min_interval: defaults.ors_min_interval,
            nominatim_base_url: non_empty_var(NOMINATIM_BASE_URL_ENV)
                .unwrap_or(defaults.nominatim_base_url),
            eia_api_key: non_empty_var(EIA_API_KEY_ENV),
        }
    }

    pub fn geocoder(&self) -> Result<Arc<dyn Geocoder>> {
        Ok(Arc::new(NominatimGeocoder::with_base_url(
            &self.nominatim_base_url,
        )?))
    }

    /// # Errors
    /// [`Error::InvalidParameter`] when no OpenRouteService key is configured.
    pub fn road_router(&self) -> Result<Arc<dyn RoadRouter>> {
        let key = self
            .ors_api_key
            .as_deref()
            .ok_or_else(|| Error::invalid("ORS_API_KEY", "must be set to route trips"))?;
        let router = OpenRouteServiceRouter::with_base_url(key, &self.ors_base_url)?
            .with_min_interval(self.ors_min_interval);
        Ok(Arc::new(router))
    }

    /// Live EIA feed when a key is configured; otherwise every lookup falls
    /// back to the constant price.
    pub fn price_source(&self) -> Result<Arc<dyn PriceSource>> {
        match &self.eia_api_key {
            Some(key) => {
                info!("using EIA weekly diesel price feed");
                Ok(Arc::new(EiaDieselPrice::new(key.as_str())?))
            }
            None => {
                warn!("EIA_API_KEY not set, diesel price will use the fallback constant");
                Ok(Arc::new(UnconfiguredPrice))
            }
        }
    }
}
