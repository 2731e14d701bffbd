use std::time::Duration;

use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::error::{Error, Result};

use super::{PriceSource, USER_AGENT};

pub const DEFAULT_EIA_BASE_URL: &str = "https://api.eia.gov";
/// Weekly US average retail on-highway diesel price, dollars per gallon.
pub const EIA_DIESEL_SERIES: &str = "EMD_EPD2D_PTE_NUS_DPG";
const PRICE_TIMEOUT: Duration = Duration::from_secs(10);

/// Price source returning a constant. Used offline and in tests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedPrice(pub f64);

impl PriceSource for FixedPrice {
    fn diesel_price_per_gallon(&self) -> Result<f64> {
        Ok(self.0)
    }
}

/// Price source used when no live feed is configured; every lookup fails so
/// callers record the fallback price.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnconfiguredPrice;

impl PriceSource for UnconfiguredPrice {
    fn diesel_price_per_gallon(&self) -> Result<f64> {
        Err(Error::PriceLookup {
            message: "no diesel price feed configured".to_string(),
        })
    }
}

/// Blocking client for the EIA open data API (v2).
#[derive(Debug, Clone)]
pub struct EiaDieselPrice {
    client: Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct SeriesEnvelope {
    response: SeriesResponse,
}

#[derive(Debug, Deserialize)]
struct SeriesResponse {
    #[serde(default)]
    data: Vec<SeriesPoint>,
}

#[derive(Debug, Deserialize)]
struct SeriesPoint {
    #[serde(default)]
    period: Option<String>,
    // EIA returns the value as a number or as a quoted string depending on series.
    #[serde(default)]
    value: Value,
}

impl EiaDieselPrice {
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_base_url(api_key, DEFAULT_EIA_BASE_URL)
    }

    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(PRICE_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }
}

impl PriceSource for EiaDieselPrice {
    fn diesel_price_per_gallon(&self) -> Result<f64> {
        let url = format!("{}/v2/petroleum/pri/gnd/data/", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("frequency", "weekly"),
                ("data[0]", "value"),
                ("facets[series][]", EIA_DIESEL_SERIES),
                ("sort[0][column]", "period"),
                ("sort[0][direction]", "desc"),
                ("length", "1"),
            ])
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::PriceLookup {
                message: format!("unexpected status {status}"),
            });
        }
        parse_latest_price(&response.text()?)
    }
}

fn parse_latest_price(body: &str) -> Result<f64> {
    let envelope: SeriesEnvelope = serde_json::from_str(body).map_err(|e| Error::PriceLookup {
        message: format!("malformed response: {e}"),
    })?;
    let point = envelope
        .response
        .data
        .into_iter()
        .next()
        .ok_or_else(|| Error::PriceLookup {
            message: "series returned no observations".to_string(),
        })?;

    let price = match &point.value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|p| p.is_finite() && *p > 0.0)
    .ok_or_else(|| Error::PriceLookup {
        message: format!("unusable price value {}", point.value),
    })?;

    debug!(price, period = point.period.as_deref().unwrap_or("unknown"), "diesel price");
    Ok(price)
}
