//! Full trip comparison using the live geocoding, routing and price services.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};

use haulplan_lib::{
    ExternalConfig, FixedPrice, PlanningContext, PriceSource, RouteAlgorithm,
    RoutePlanningService, ServiceConfig, TripQuery,
};

use crate::commands::load_network;
use crate::output::{render_trip, write_json, OutputFormat};

pub struct TripArgs {
    pub from: String,
    pub to: String,
    pub trips: u32,
    pub economy: Option<f64>,
    pub algorithm: RouteAlgorithm,
    pub max_leg: f64,
    /// Skips the live price feed.
    pub diesel_price: Option<f64>,
    pub geojson: Option<PathBuf>,
}

pub fn handle_trip(stations: &[PathBuf], args: &TripArgs, format: OutputFormat) -> Result<()> {
    let context = PlanningContext::new(load_network(stations)?);
    let external = ExternalConfig::from_env();

    let geocoder = external.geocoder().context("failed to build geocoding client")?;
    let router = external
        .road_router()
        .context("road routing is unavailable; set ORS_API_KEY")?;
    let price_source: Arc<dyn PriceSource> = match args.diesel_price {
        Some(price) => Arc::new(FixedPrice(price)),
        None => external
            .price_source()
            .context("failed to build diesel price client")?,
    };

    let config = ServiceConfig {
        max_leg_miles: args.max_leg,
        algorithm: args.algorithm,
        ..ServiceConfig::default()
    };
    let service = RoutePlanningService::new(context, geocoder, router, price_source, config);

    let mut query = TripQuery::new(args.from.as_str(), args.to.as_str()).with_trips(args.trips);
    if let Some(economy) = args.economy {
        query = query.with_economy(economy);
    }

    let report = service
        .plan_trip(&query)
        .with_context(|| format!("failed to plan trip from '{}' to '{}'", args.from, args.to))?;
    if let Some(path) = &args.geojson {
        write_geojson(path, &report.to_geojson())?;
    }
    render_trip(&report, format).context("failed to write trip output")
}

fn write_geojson(path: &Path, collection: &serde_json::Value) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create GeoJSON file {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    write_json(&mut writer, collection)
        .and_then(|()| writer.flush())
        .with_context(|| format!("failed to write GeoJSON file {}", path.display()))
}
