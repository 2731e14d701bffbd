use std::fmt::Write;

use serde::Serialize;

use crate::cost::TripCostResult;
use crate::geo::{haversine_miles, GeoPoint};
use crate::routing::{RouteAlgorithm, RoutePlan};
use crate::service::{PriceProvenance, TripReport};

/// Presentation style for turning summaries into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    #[default]
    PlainText,
    RichText,
}

/// Role of a waypoint within a planned route.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WaypointKind {
    Origin,
    Charger,
    Destination,
}

impl WaypointKind {
    fn label(self) -> &'static str {
        match self {
            WaypointKind::Origin => "origin",
            WaypointKind::Charger => "charger",
            WaypointKind::Destination => "destination",
        }
    }
}

/// Waypoint with the great-circle length of the leg that reaches it.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PlanStep {
    pub index: usize,
    pub kind: WaypointKind,
    pub location: GeoPoint,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Zero for the origin.
    pub leg_miles: f64,
}

impl PlanStep {
    fn display_name(&self) -> String {
        match &self.name {
            Some(name) => format!("{name} ({})", self.location),
            None => self.location.to_string(),
        }
    }
}

/// Structured representation of a [`RoutePlan`] for CLI and JSON consumers.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PlanSummary {
    pub algorithm: RouteAlgorithm,
    pub feasible: bool,
    pub max_leg_miles: f64,
    pub stops: usize,
    pub great_circle_miles: f64,
    pub longest_leg_miles: f64,
    pub steps: Vec<PlanStep>,
}

impl PlanSummary {
    pub fn from_plan(plan: &RoutePlan, max_leg_miles: f64) -> Self {
        let last = plan.waypoints.len().saturating_sub(1);
        let steps = plan
            .waypoints
            .iter()
            .enumerate()
            .map(|(index, &location)| {
                let kind = if index == 0 {
                    WaypointKind::Origin
                } else if index == last {
                    WaypointKind::Destination
                } else {
                    WaypointKind::Charger
                };
                let name = match kind {
                    WaypointKind::Charger => plan
                        .stops
                        .get(index - 1)
                        .and_then(|stop| stop.name.clone()),
                    _ => None,
                };
                let leg_miles = if index == 0 {
                    0.0
                } else {
                    haversine_miles(plan.waypoints[index - 1], location)
                };
                PlanStep {
                    index,
                    kind,
                    location,
                    name,
                    leg_miles,
                }
            })
            .collect();

        Self {
            algorithm: plan.algorithm,
            feasible: plan.feasible,
            max_leg_miles,
            stops: plan.stop_count(),
            great_circle_miles: plan.great_circle_miles(),
            longest_leg_miles: plan.longest_leg_miles(),
            steps,
        }
    }

    pub fn render(&self, mode: RenderMode) -> String {
        match mode {
            RenderMode::PlainText => self.render_plain(),
            RenderMode::RichText => self.render_rich(),
        }
    }

    fn render_plain(&self) -> String {
        let mut buffer = String::new();
        if !self.feasible {
            let _ = writeln!(
                buffer,
                "No feasible route within {:.0} mi legs (algorithm: {})",
                self.max_leg_miles, self.algorithm
            );
            return buffer;
        }
        let _ = writeln!(
            buffer,
            "Route: {} stops, {:.1} mi great-circle, longest leg {:.1} mi (algorithm: {})",
            self.stops, self.great_circle_miles, self.longest_leg_miles, self.algorithm
        );
        for step in &self.steps {
            let _ = writeln!(
                buffer,
                "{:>3}: {:<11} {} {:>8.1} mi",
                step.index,
                step.kind.label(),
                step.display_name(),
                step.leg_miles
            );
        }
        buffer
    }

    fn render_rich(&self) -> String {
        let mut buffer = String::new();
        if !self.feasible {
            let _ = writeln!(
                buffer,
                "**Route unavailable**: no charger sequence keeps legs within `{:.0}` mi",
                self.max_leg_miles
            );
            return buffer;
        }
        let _ = writeln!(
            buffer,
            "**Route**: {} stops, {:.1} mi (algorithm: `{}`)",
            self.stops, self.great_circle_miles, self.algorithm
        );
        for step in &self.steps {
            let _ = writeln!(
                buffer,
                "* {:>2}. _{}_ **{}** (+{:.1} mi)",
                step.index,
                step.kind.label(),
                step.display_name(),
                step.leg_miles
            );
        }
        buffer
    }
}

fn write_cost(buffer: &mut String, indent: &str, cost: &TripCostResult) {
    let _ = writeln!(buffer, "{indent}annual miles:  {:>12.1}", cost.annual_miles);
    let _ = writeln!(buffer, "{indent}energy:        {:>12.2}", cost.fuel_cost);
    let _ = writeln!(buffer, "{indent}maintenance:   {:>12.2}", cost.maintenance_cost);
    let _ = writeln!(buffer, "{indent}depreciation:  {:>12.2}", cost.depreciation_cost);
    let _ = writeln!(buffer, "{indent}total:         {:>12.2}", cost.total_cost);
    let _ = writeln!(buffer, "{indent}emissions (t): {:>12.2}", cost.emissions_tonnes);
}

impl TripCostResult {
    /// Render a cost breakdown as aligned text.
    pub fn render(&self) -> String {
        let mut buffer = String::new();
        let _ = writeln!(buffer, "{} annual cost", self.profile);
        write_cost(&mut buffer, "  ", self);
        buffer
    }
}

impl TripReport {
    pub fn render(&self, mode: RenderMode) -> String {
        match mode {
            RenderMode::PlainText => self.render_plain(),
            RenderMode::RichText => self.render_rich(),
        }
    }

    fn price_note(&self) -> &'static str {
        match self.diesel_price.provenance {
            PriceProvenance::Live => "live",
            PriceProvenance::Fallback => "fallback",
        }
    }

    fn render_plain(&self) -> String {
        let mut buffer = String::new();
        let _ = writeln!(
            buffer,
            "Trip: {} -> {} ({} trips/year)",
            self.origin.label, self.destination.label, self.trips_per_year
        );
        let _ = writeln!(
            buffer,
            "Diesel: {:.1} mi at ${:.3}/gal ({})",
            self.diesel.road_miles,
            self.diesel_price.per_gallon,
            self.price_note()
        );
        write_cost(&mut buffer, "  ", &self.diesel.cost);

        let electric = &self.electric;
        match (electric.road_miles, &electric.cost) {
            (Some(miles), Some(cost)) if electric.feasible => {
                let _ = writeln!(
                    buffer,
                    "Electric: {:.1} mi with {} charging stops",
                    miles,
                    electric.stops.len()
                );
                for stop in &electric.stops {
                    let _ = writeln!(
                        buffer,
                        "  stop: {} {}",
                        stop.name.as_deref().unwrap_or("charger"),
                        stop.location
                    );
                }
                if electric.legs_over_range > 0 {
                    let _ = writeln!(
                        buffer,
                        "  warning: {} legs exceed {:.0} mi by road",
                        electric.legs_over_range, self.max_leg_miles
                    );
                }
                write_cost(&mut buffer, "  ", cost);
            }
            _ => {
                let _ = writeln!(
                    buffer,
                    "Electric: unavailable, no charger sequence within {:.0} mi legs",
                    self.max_leg_miles
                );
            }
        }
        buffer
    }

    fn render_rich(&self) -> String {
        let mut buffer = String::new();
        let _ = writeln!(
            buffer,
            "**{}** → **{}** (_{} trips/year_)",
            self.origin.label, self.destination.label, self.trips_per_year
        );
        let _ = writeln!(
            buffer,
            "* Diesel: `{:.1}` mi, total `${:.2}`, `{:.2}` t CO2e",
            self.diesel.road_miles, self.diesel.cost.total_cost, self.diesel.cost.emissions_tonnes
        );
        match (&self.electric.cost, self.electric.road_miles) {
            (Some(cost), Some(miles)) => {
                let _ = writeln!(
                    buffer,
                    "* Electric: `{:.1}` mi, {} stops, total `${:.2}`, `{:.2}` t CO2e",
                    miles,
                    self.electric.stops.len(),
                    cost.total_cost,
                    cost.emissions_tonnes
                );
            }
            _ => {
                let _ = writeln!(buffer, "* Electric: _unavailable_");
            }
        }
        buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::ChargingNetwork;
    use crate::routing::plan;

    #[test]
    fn plan_summary_labels_waypoints() {
        let network = ChargingNetwork::from_points([GeoPoint::new(0.0, 2.5)]);
        let route = plan(GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 5.0), 225.0, &network).unwrap();
        let summary = PlanSummary::from_plan(&route, 225.0);

        assert_eq!(summary.steps.len(), 3);
        assert_eq!(summary.steps[0].kind, WaypointKind::Origin);
        assert_eq!(summary.steps[1].kind, WaypointKind::Charger);
        assert_eq!(summary.steps[2].kind, WaypointKind::Destination);
        assert_eq!(summary.steps[0].leg_miles, 0.0);
        assert!(summary.steps[1].leg_miles > 170.0);

        let text = summary.render(RenderMode::PlainText);
        assert!(text.starts_with("Route: 1 stops"));
        assert!(text.contains("charger"));
    }

    #[test]
    fn infeasible_summary_renders_notice() {
        let route = plan(
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(0.0, 10.0),
            100.0,
            &ChargingNetwork::default(),
        )
        .unwrap();
        let summary = PlanSummary::from_plan(&route, 100.0);
        assert!(summary.steps.is_empty());
        assert!(summary
            .render(RenderMode::PlainText)
            .contains("No feasible route within 100 mi"));
        assert!(summary.render(RenderMode::RichText).contains("unavailable"));
    }
}
