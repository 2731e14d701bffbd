//! Offline cost estimation.

use anyhow::{Context, Result};

use haulplan_lib::cost::estimate_with_default_economy;
use haulplan_lib::{estimate, CostProfile, PropulsionKind};

use crate::output::{render_costs, OutputFormat};

pub struct EstimateArgs {
    pub miles: f64,
    pub trips: u32,
    pub economy: Option<f64>,
    /// Both profiles are estimated when absent.
    pub profile: Option<PropulsionKind>,
    pub diesel_price: f64,
}

pub fn handle_estimate(args: &EstimateArgs, format: OutputFormat) -> Result<()> {
    let kinds = match args.profile {
        Some(kind) => vec![kind],
        None => vec![PropulsionKind::Diesel, PropulsionKind::Electric],
    };

    let mut results = Vec::with_capacity(kinds.len());
    for kind in kinds {
        let profile = match kind {
            PropulsionKind::Diesel => CostProfile::diesel(args.diesel_price),
            PropulsionKind::Electric => CostProfile::electric(),
        };
        // A user economy figure is in mpg, so it only applies to diesel
        // unless electric was requested explicitly.
        let economy = match (kind, args.economy, args.profile) {
            (PropulsionKind::Diesel, Some(economy), _) => Some(economy),
            (PropulsionKind::Electric, Some(economy), Some(_)) => Some(economy),
            _ => None,
        };
        let result = match economy {
            Some(economy) => estimate(args.miles, args.trips, economy, &profile),
            None => estimate_with_default_economy(args.miles, args.trips, &profile),
        }
        .with_context(|| format!("failed to estimate {kind} cost"))?;
        results.push(result);
    }

    render_costs(&results, format).context("failed to write estimate output")
}
