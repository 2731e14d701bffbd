//! Range-constrained route planning through the charging network.
//!
//! This module provides:
//! - [`RouteAlgorithm`] - Supported planning strategies (greedy, Dijkstra)
//! - [`RouteRequest`] - Origin, destination, range and trip parameters
//! - [`RoutePlan`] - Ordered waypoints and the charging stops used
//! - [`plan`] / [`plan_route`] - Entry points for computing plans
//!
//! # Strategy Pattern
//!
//! Each algorithm is encapsulated in a [`RoutePlanner`] implementation selected
//! by [`select_planner`]. Every strategy must only emit sequences where each
//! leg's great-circle distance is within the range limit.
//!
//! An unreachable destination is a normal outcome: the plan is returned with
//! `feasible == false` rather than as an error.
//!
//! # Example
//!
//! ```
//! use haulplan_lib::{plan, ChargingNetwork, GeoPoint};
//!
//! let network = ChargingNetwork::from_points([GeoPoint::new(0.0, 2.5)]);
//! let plan = plan(GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 5.0), 225.0, &network).unwrap();
//! assert!(plan.feasible);
//! assert_eq!(plan.stop_count(), 1);
//! ```

mod planner;

pub use planner::{select_planner, DijkstraPlanner, GreedyPlanner, RoutePlanner};

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cost::DEFAULT_DIESEL_MPG;
use crate::error::{Error, Result};
use crate::geo::{haversine_miles, GeoPoint};
use crate::network::{ChargingFacility, ChargingNetwork};

/// Default maximum leg for the electric vehicle profile, in miles.
pub const DEFAULT_MAX_LEG_MILES: f64 = 225.0;

/// Supported planning strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RouteAlgorithm {
    /// Greedy best-progress search toward the destination.
    #[default]
    Greedy,
    /// Shortest total great-circle distance over the range-limited graph.
    Dijkstra,
}

impl fmt::Display for RouteAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            RouteAlgorithm::Greedy => "greedy",
            RouteAlgorithm::Dijkstra => "dijkstra",
        };
        f.write_str(value)
    }
}

impl FromStr for RouteAlgorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "greedy" => Ok(RouteAlgorithm::Greedy),
            "dijkstra" => Ok(RouteAlgorithm::Dijkstra),
            other => Err(Error::invalid(
                "algorithm",
                format!("unknown algorithm '{other}', expected greedy or dijkstra"),
            )),
        }
    }
}

/// A single trip planning request.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteRequest {
    pub origin: GeoPoint,
    pub destination: GeoPoint,
    /// Maximum great-circle distance of a single leg, in miles.
    pub max_leg_miles: f64,
    /// Number of one-way trips per year.
    pub trips_per_year: u32,
    /// Fuel (mpg) or energy (mi/kWh) economy.
    pub economy: f64,
    pub algorithm: RouteAlgorithm,
}

impl RouteRequest {
    /// Greedy request with one trip per year and the default diesel economy.
    pub fn new(origin: GeoPoint, destination: GeoPoint, max_leg_miles: f64) -> Self {
        Self {
            origin,
            destination,
            max_leg_miles,
            trips_per_year: 1,
            economy: DEFAULT_DIESEL_MPG,
            algorithm: RouteAlgorithm::Greedy,
        }
    }

    pub fn with_algorithm(mut self, algorithm: RouteAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn with_trips(mut self, trips_per_year: u32, economy: f64) -> Self {
        self.trips_per_year = trips_per_year;
        self.economy = economy;
        self
    }

    /// Validate coordinates, range and trip parameters.
    pub fn validate(&self) -> Result<()> {
        self.origin.validate()?;
        self.destination.validate()?;
        validate_max_leg(self.max_leg_miles)?;
        if self.trips_per_year < 1 {
            return Err(Error::invalid("trips_per_year", "must be at least 1"));
        }
        if !self.economy.is_finite() || self.economy <= 0.0 {
            return Err(Error::invalid(
                "economy",
                format!("must be finite and positive, got {}", self.economy),
            ));
        }
        Ok(())
    }
}

/// Planned route returned by the library.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoutePlan {
    pub algorithm: RouteAlgorithm,
    pub feasible: bool,
    /// Origin, every charging stop, then destination. Empty when infeasible.
    pub waypoints: Vec<GeoPoint>,
    /// Charging facilities used, in travel order.
    pub stops: Vec<ChargingFacility>,
}

impl RoutePlan {
    fn direct(algorithm: RouteAlgorithm, origin: GeoPoint, destination: GeoPoint) -> Self {
        Self {
            algorithm,
            feasible: true,
            waypoints: vec![origin, destination],
            stops: Vec::new(),
        }
    }

    fn infeasible(algorithm: RouteAlgorithm) -> Self {
        Self {
            algorithm,
            feasible: false,
            waypoints: Vec::new(),
            stops: Vec::new(),
        }
    }

    pub fn stop_count(&self) -> usize {
        self.stops.len()
    }

    pub fn leg_count(&self) -> usize {
        self.waypoints.len().saturating_sub(1)
    }

    /// Consecutive waypoint pairs.
    pub fn legs(&self) -> impl Iterator<Item = (GeoPoint, GeoPoint)> + '_ {
        self.waypoints.windows(2).map(|pair| (pair[0], pair[1]))
    }

    /// Sum of great-circle leg distances in miles.
    pub fn great_circle_miles(&self) -> f64 {
        self.legs().map(|(a, b)| haversine_miles(a, b)).sum()
    }

    /// Longest great-circle leg in miles, zero for an empty plan.
    pub fn longest_leg_miles(&self) -> f64 {
        self.legs()
            .map(|(a, b)| haversine_miles(a, b))
            .fold(0.0, f64::max)
    }
}

fn validate_max_leg(max_leg: f64) -> Result<()> {
    if !max_leg.is_finite() || max_leg <= 0.0 {
        return Err(Error::invalid(
            "max_leg_miles",
            format!("must be finite and positive, got {max_leg}"),
        ));
    }
    Ok(())
}

/// Plan a route with the greedy best-progress strategy.
pub fn plan(
    origin: GeoPoint,
    destination: GeoPoint,
    max_leg: f64,
    network: &ChargingNetwork,
) -> Result<RoutePlan> {
    plan_with(&GreedyPlanner, origin, destination, max_leg, network)
}

/// Plan a route for a full request using its selected algorithm.
pub fn plan_route(network: &ChargingNetwork, request: &RouteRequest) -> Result<RoutePlan> {
    request.validate()?;
    let planner = select_planner(request.algorithm);
    plan_with(
        planner.as_ref(),
        request.origin,
        request.destination,
        request.max_leg_miles,
        network,
    )
}

fn plan_with(
    planner: &dyn RoutePlanner,
    origin: GeoPoint,
    destination: GeoPoint,
    max_leg: f64,
    network: &ChargingNetwork,
) -> Result<RoutePlan> {
    origin.validate()?;
    destination.validate()?;
    validate_max_leg(max_leg)?;
    let algorithm = planner.algorithm();

    if haversine_miles(origin, destination) <= max_leg {
        debug!(%origin, %destination, "destination within range, no charging stops needed");
        return Ok(RoutePlan::direct(algorithm, origin, destination));
    }

    let Some(stop_ids) = planner.find_stops(network, origin, destination, max_leg) else {
        debug!(%origin, %destination, max_leg, %algorithm, "no feasible charging sequence");
        return Ok(RoutePlan::infeasible(algorithm));
    };

    let stops: Vec<ChargingFacility> = stop_ids
        .iter()
        .filter_map(|&id| network.get(id).cloned())
        .collect();

    let mut waypoints = Vec::with_capacity(stops.len() + 2);
    waypoints.push(origin);
    waypoints.extend(stops.iter().map(|s| s.location));
    waypoints.push(destination);

    let plan = RoutePlan {
        algorithm,
        feasible: true,
        waypoints,
        stops,
    };
    debug!(
        stops = plan.stop_count(),
        miles = plan.great_circle_miles(),
        %algorithm,
        "planned charging route"
    );
    Ok(plan)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn algorithm_parses_and_displays() {
        assert_eq!("Greedy".parse::<RouteAlgorithm>().unwrap(), RouteAlgorithm::Greedy);
        assert_eq!("dijkstra".parse::<RouteAlgorithm>().unwrap(), RouteAlgorithm::Dijkstra);
        assert!("a-star".parse::<RouteAlgorithm>().is_err());
        assert_eq!(RouteAlgorithm::Dijkstra.to_string(), "dijkstra");
    }

    #[test]
    fn route_plan_counts() {
        let plan = RoutePlan::direct(
            RouteAlgorithm::Greedy,
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(0.0, 1.0),
        );
        assert_eq!(plan.leg_count(), 1);
        assert_eq!(plan.stop_count(), 0);
        assert!((plan.great_circle_miles() - 69.09).abs() < 0.01);
    }

    #[test]
    fn infeasible_plan_is_empty() {
        let plan = RoutePlan::infeasible(RouteAlgorithm::Greedy);
        assert!(!plan.feasible);
        assert_eq!(plan.leg_count(), 0);
        assert_eq!(plan.longest_leg_miles(), 0.0);
    }

    #[test]
    fn rejects_non_positive_range() {
        let network = ChargingNetwork::default();
        let a = GeoPoint::new(0.0, 0.0);
        let b = GeoPoint::new(0.0, 1.0);
        for bad in [0.0, -10.0, f64::NAN, f64::INFINITY] {
            let err = plan(a, b, bad, &network).unwrap_err();
            assert!(matches!(err, Error::InvalidParameter { parameter: "max_leg_miles", .. }));
        }
    }

    #[test]
    fn rejects_out_of_bounds_endpoints() {
        let network = ChargingNetwork::default();
        let err = plan(GeoPoint::new(95.0, 0.0), GeoPoint::new(89.0, 0.5), 225.0, &network)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidCoordinate { .. }));

        let err = plan(GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 181.0), 225.0, &network)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidCoordinate { .. }));
    }

    #[test]
    fn request_validation_rejects_zero_trips() {
        let request = RouteRequest::new(GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 1.0), 225.0)
            .with_trips(0, 9.0);
        assert!(request.validate().is_err());
    }
}
