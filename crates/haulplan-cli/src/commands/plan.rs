//! Offline route planning through the charging network.

use std::path::PathBuf;

use anyhow::{Context, Result};

use haulplan_lib::{plan_route, GeoPoint, PlanSummary, RouteAlgorithm, RouteRequest};

use crate::commands::load_network;
use crate::output::{render_plan, OutputFormat};

pub struct PlanArgs {
    pub origin: GeoPoint,
    pub destination: GeoPoint,
    pub algorithm: RouteAlgorithm,
    pub max_leg: f64,
}

/// An infeasible route is printed and still exits successfully.
pub fn handle_plan(stations: &[PathBuf], args: &PlanArgs, format: OutputFormat) -> Result<()> {
    let network = load_network(stations)?;
    let request = RouteRequest::new(args.origin, args.destination, args.max_leg)
        .with_algorithm(args.algorithm);
    let plan = plan_route(&network, &request).context("route planning failed")?;
    let summary = PlanSummary::from_plan(&plan, args.max_leg);
    render_plan(&summary, format).context("failed to write plan output")
}
