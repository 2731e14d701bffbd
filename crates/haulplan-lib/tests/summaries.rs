mod common;

use haulplan_lib::output::WaypointKind;
use haulplan_lib::{plan, PlanSummary, RenderMode};

use common::{corridor_network, LOS_ANGELES, NEW_YORK};

#[test]
fn corridor_summary_lists_every_waypoint() {
    let route = plan(LOS_ANGELES, NEW_YORK, 225.0, &corridor_network()).unwrap();
    let summary = PlanSummary::from_plan(&route, 225.0);

    assert!(summary.feasible);
    assert_eq!(summary.steps.len(), route.waypoints.len());
    assert_eq!(summary.stops, 13);
    assert_eq!(summary.steps[1].name.as_deref(), Some("Corridor 01"));
    assert_eq!(summary.steps.last().map(|s| s.kind), Some(WaypointKind::Destination));
    assert!(summary.longest_leg_miles <= 225.0);

    let total: f64 = summary.steps.iter().map(|s| s.leg_miles).sum();
    assert!((total - summary.great_circle_miles).abs() < 1e-6);
}

#[test]
fn plain_and_rich_renderings_differ() {
    let route = plan(LOS_ANGELES, NEW_YORK, 225.0, &corridor_network()).unwrap();
    let summary = PlanSummary::from_plan(&route, 225.0);

    let plain = summary.render(RenderMode::PlainText);
    assert!(plain.starts_with("Route: 13 stops"));
    assert!(plain.contains("Corridor 13"));
    assert_eq!(plain.lines().count(), 1 + route.waypoints.len());

    let rich = summary.render(RenderMode::RichText);
    assert!(rich.starts_with("**Route**"));
}

#[test]
fn summary_serializes_to_json() {
    let route = plan(LOS_ANGELES, NEW_YORK, 150.0, &corridor_network()).unwrap();
    let summary = PlanSummary::from_plan(&route, 150.0);
    let json = serde_json::to_value(&summary).unwrap();
    assert_eq!(json["feasible"], false);
    assert_eq!(json["algorithm"], "greedy");
    assert_eq!(json["steps"].as_array().map(Vec::len), Some(0));
}
