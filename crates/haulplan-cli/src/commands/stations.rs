//! Charging network queries.

use std::path::PathBuf;

use anyhow::{Context, Result};

use haulplan_lib::GeoPoint;

use crate::commands::load_network;
use crate::output::{render_stations, OutputFormat, StationHit};

pub struct StationsArgs {
    pub near: Option<GeoPoint>,
    pub radius: f64,
    pub limit: usize,
}

/// List stations near a point, or the first `limit` in load order when no
/// point is given.
pub fn handle_stations(stations: &[PathBuf], args: &StationsArgs, format: OutputFormat) -> Result<()> {
    let network = load_network(stations)?;
    let report = network.load_report();
    eprintln!(
        "{} stations loaded ({} skipped, {} duplicates)",
        report.loaded, report.skipped, report.duplicates
    );

    let hits: Vec<StationHit> = match args.near {
        Some(point) => {
            point.validate().context("invalid --near coordinate")?;
            network
                .within(point, args.radius)
                .into_iter()
                .take(args.limit)
                .map(|(facility, miles)| StationHit::new(facility, miles))
                .collect()
        }
        None => network
            .iter()
            .take(args.limit)
            .map(|facility| StationHit::new(facility, 0.0))
            .collect(),
    };

    render_stations(&hits, format).context("failed to write stations output")
}
