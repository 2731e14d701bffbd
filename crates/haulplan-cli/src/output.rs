//! Output formatting for subcommand results.

use std::io::{self, Write};

use clap::ValueEnum;
use serde::Serialize;

use haulplan_lib::output::WaypointKind;
use haulplan_lib::{ChargingFacility, GeoPoint, PlanSummary, RenderMode, TripCostResult, TripReport};

use crate::terminal::{format_dollars, ColorPalette};

/// Output format selected with `--format`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// Markdown-flavoured text.
    Rich,
    /// Pretty-printed JSON.
    Json,
}

/// Write any serializable value as pretty JSON followed by a newline.
pub fn write_json<W: Write, T: Serialize + ?Sized>(writer: &mut W, value: &T) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *writer, value).map_err(io::Error::other)?;
    writer.write_all(b"\n")
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    write_json(&mut handle, value)
}

/// Render a planned route.
pub fn render_plan(summary: &PlanSummary, format: OutputFormat) -> io::Result<()> {
    match format {
        OutputFormat::Json => print_json(summary),
        OutputFormat::Rich => {
            print!("{}", summary.render(RenderMode::RichText));
            Ok(())
        }
        OutputFormat::Text => {
            print!("{}", plan_text(summary, ColorPalette::detect()));
            Ok(())
        }
    }
}

/// Colored text view of a plan; one header line plus one line per waypoint.
pub fn plan_text(summary: &PlanSummary, p: ColorPalette) -> String {
    if !summary.feasible {
        return format!(
            "{}Infeasible{}: no charging sequence keeps every leg within {:.0} mi (algorithm: {})\n",
            p.red, p.reset, summary.max_leg_miles, summary.algorithm
        );
    }

    let mut out = format!(
        "{}Feasible{}: {} charging stops, {:.1} mi great-circle (algorithm: {})\n",
        p.green, p.reset, summary.stops, summary.great_circle_miles, summary.algorithm
    );
    for step in &summary.steps {
        let marker = match step.kind {
            WaypointKind::Origin => '+',
            WaypointKind::Charger => '|',
            WaypointKind::Destination => '-',
        };
        let name = step.name.as_deref().unwrap_or("");
        let leg = if step.index == 0 {
            String::new()
        } else {
            format!(" {}(+{:.1} mi){}", p.gray, step.leg_miles, p.reset)
        };
        out.push_str(&format!(
            "{marker} {}{}{} {name}{leg}\n",
            p.cyan, step.location, p.reset
        ));
    }
    out
}

/// Render one or more cost breakdowns.
pub fn render_costs(results: &[TripCostResult], format: OutputFormat) -> io::Result<()> {
    match format {
        OutputFormat::Json => match results {
            [single] => print_json(single),
            many => print_json(many),
        },
        OutputFormat::Text | OutputFormat::Rich => {
            for result in results {
                print!("{}", cost_text(result));
            }
            Ok(())
        }
    }
}

pub fn cost_text(result: &TripCostResult) -> String {
    format!(
        "{} ({:.1} annual miles)\n  energy:        {:>14}\n  maintenance:   {:>14}\n  depreciation:  {:>14}\n  total:         {:>14}\n  emissions:     {:>11.2} t\n",
        result.profile,
        result.annual_miles,
        format_dollars(result.fuel_cost),
        format_dollars(result.maintenance_cost),
        format_dollars(result.depreciation_cost),
        format_dollars(result.total_cost),
        result.emissions_tonnes,
    )
}

/// A charging facility found near a query point.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StationHit {
    pub id: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub location: GeoPoint,
    pub distance_miles: f64,
}

impl StationHit {
    pub fn new(facility: &ChargingFacility, distance_miles: f64) -> Self {
        Self {
            id: facility.id,
            name: facility.name.clone(),
            location: facility.location,
            distance_miles,
        }
    }
}

pub fn render_stations(hits: &[StationHit], format: OutputFormat) -> io::Result<()> {
    match format {
        OutputFormat::Json => print_json(hits),
        OutputFormat::Text | OutputFormat::Rich => {
            if hits.is_empty() {
                println!("No charging stations found.");
                return Ok(());
            }
            println!("{:>5}  {:<24} {:<20} {:>10}", "ID", "Name", "Location", "Miles");
            for hit in hits {
                println!(
                    "{:>5}  {:<24} {:<20} {:>10.1}",
                    hit.id,
                    hit.name.as_deref().unwrap_or("-"),
                    hit.location.to_string(),
                    hit.distance_miles
                );
            }
            Ok(())
        }
    }
}

pub fn render_trip(report: &TripReport, format: OutputFormat) -> io::Result<()> {
    match format {
        OutputFormat::Json => print_json(report),
        OutputFormat::Text => {
            print!("{}", report.render(RenderMode::PlainText));
            Ok(())
        }
        OutputFormat::Rich => {
            print!("{}", report.render(RenderMode::RichText));
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use haulplan_lib::{estimate, plan, ChargingNetwork, CostProfile};

    #[test]
    fn plan_text_marks_every_waypoint() {
        let network = ChargingNetwork::from_points([GeoPoint::new(0.0, 2.5)]);
        let route = plan(GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 5.0), 225.0, &network).unwrap();
        let text = plan_text(&PlanSummary::from_plan(&route, 225.0), ColorPalette::plain());

        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("Feasible: 1 charging stops"));
        assert!(lines[1].starts_with("+ 0.0000,0.0000"));
        assert!(lines[2].starts_with("| 0.0000,2.5000"));
        assert!(lines[3].starts_with("- 0.0000,5.0000"));
    }

    #[test]
    fn infeasible_plan_text() {
        let route = plan(
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(0.0, 10.0),
            100.0,
            &ChargingNetwork::default(),
        )
        .unwrap();
        let text = plan_text(&PlanSummary::from_plan(&route, 100.0), ColorPalette::plain());
        assert!(text.starts_with("Infeasible"));
    }

    #[test]
    fn cost_text_formats_dollars() {
        let result = estimate(500.0, 50, 9.0, &CostProfile::diesel(3.80)).unwrap();
        let text = cost_text(&result);
        assert!(text.starts_with("diesel (25000.0 annual miles)"));
        assert!(text.contains("$15,915.56"));
        assert!(text.contains("40.25 t"));
    }

    #[test]
    fn write_json_appends_newline() {
        let mut buffer = Vec::new();
        write_json(&mut buffer, &serde_json::json!({"a": 1})).unwrap();
        assert!(buffer.ends_with(b"\n"));
    }
}
