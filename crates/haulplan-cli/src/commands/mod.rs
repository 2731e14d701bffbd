//! Subcommand handlers. `main.rs` parses arguments and dispatches here.

pub mod estimate;
pub mod plan;
pub mod stations;
pub mod trip;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use tracing::debug;

use haulplan_lib::ChargingNetwork;

/// Default station file looked up in the working directory.
const DEFAULT_STATIONS_FILE: &str = "charging_stations.csv";

/// Candidate station files when `--stations` is not given.
fn station_candidates() -> Vec<PathBuf> {
    let mut candidates = vec![PathBuf::from(DEFAULT_STATIONS_FILE)];
    if cfg!(debug_assertions) {
        candidates.push(
            PathBuf::from(env!("CARGO_MANIFEST_DIR"))
                .join("../../docs/fixtures")
                .join(DEFAULT_STATIONS_FILE),
        );
    }
    candidates
}

/// Load the charging network from explicit paths, or the first default
/// candidate that exists.
pub fn load_network(paths: &[PathBuf]) -> Result<ChargingNetwork> {
    if !paths.is_empty() {
        return ChargingNetwork::from_paths(paths).with_context(|| {
            format!(
                "failed to load charging stations from {}",
                display_paths(paths)
            )
        });
    }

    let Some(path) = station_candidates().into_iter().find(|p| p.exists()) else {
        bail!(
            "no charging station data found; pass --stations or set HAULPLAN_STATIONS \
             (looked for {DEFAULT_STATIONS_FILE} in the working directory)"
        );
    };
    debug!(path = %path.display(), "using default charging station file");
    ChargingNetwork::from_path(&path)
        .with_context(|| format!("failed to load charging stations from {}", path.display()))
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
