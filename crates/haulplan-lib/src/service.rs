//! Trip orchestration: geocode both ends, route the diesel leg, plan and route
//! the electric legs, price both.

use std::sync::Arc;

use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::context::PlanningContext;
use crate::cost::{
    estimate, estimate_with_default_economy, CostProfile, TripCostResult, CHARGING_DETOUR_MILES,
    DEFAULT_DIESEL_MPG, DIESEL_FALLBACK_PRICE_PER_GALLON,
};
use crate::error::{Error, Result};
use crate::external::{Geocoder, PriceSource, ResolvedPlace, RoadProfile, RoadRouter};
use crate::geo::{meters_to_miles, GeoPoint};
use crate::network::ChargingFacility;
use crate::routing::{plan_route, RouteAlgorithm, RoutePlan, RouteRequest, DEFAULT_MAX_LEG_MILES};

/// Tunables for [`RoutePlanningService`].
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    pub max_leg_miles: f64,
    pub algorithm: RouteAlgorithm,
    pub diesel_profile: RoadProfile,
    pub electric_profile: RoadProfile,
    pub detour_miles_per_stop: f64,
    pub fallback_diesel_price: f64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            max_leg_miles: DEFAULT_MAX_LEG_MILES,
            algorithm: RouteAlgorithm::Greedy,
            diesel_profile: RoadProfile::HeavyGoods,
            electric_profile: RoadProfile::Car,
            detour_miles_per_stop: CHARGING_DETOUR_MILES,
            fallback_diesel_price: DIESEL_FALLBACK_PRICE_PER_GALLON,
        }
    }
}

/// A trip between two free-text places.
#[derive(Debug, Clone, PartialEq)]
pub struct TripQuery {
    pub from: String,
    pub to: String,
    pub trips_per_year: u32,
    /// Diesel economy in mpg; the default is used when absent.
    pub economy: Option<f64>,
    /// Overrides [`ServiceConfig::algorithm`] for this trip.
    pub algorithm: Option<RouteAlgorithm>,
}

impl TripQuery {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            trips_per_year: 1,
            economy: None,
            algorithm: None,
        }
    }

    pub fn with_trips(mut self, trips_per_year: u32) -> Self {
        self.trips_per_year = trips_per_year;
        self
    }

    pub fn with_economy(mut self, economy: f64) -> Self {
        self.economy = Some(economy);
        self
    }

    pub fn with_algorithm(mut self, algorithm: RouteAlgorithm) -> Self {
        self.algorithm = Some(algorithm);
        self
    }

    fn validate(&self) -> Result<()> {
        if self.from.trim().is_empty() {
            return Err(Error::invalid("from", "must not be empty"));
        }
        if self.to.trim().is_empty() {
            return Err(Error::invalid("to", "must not be empty"));
        }
        if self.trips_per_year < 1 {
            return Err(Error::invalid("trips_per_year", "must be at least 1"));
        }
        if let Some(economy) = self.economy {
            if !economy.is_finite() || economy <= 0.0 {
                return Err(Error::invalid(
                    "economy",
                    format!("must be finite and positive, got {economy}"),
                ));
            }
        }
        Ok(())
    }
}

/// Where the diesel price in a report came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceProvenance {
    Live,
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DieselPrice {
    pub per_gallon: f64,
    pub provenance: PriceProvenance,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DieselOutcome {
    pub road_miles: f64,
    pub cost: TripCostResult,
    /// Road polyline from origin to destination.
    pub geometry: Vec<GeoPoint>,
}

/// One routed road leg of the electric trip.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoutedLeg {
    pub from: GeoPoint,
    pub to: GeoPoint,
    pub road_miles: f64,
    pub geometry: Vec<GeoPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElectricOutcome {
    pub feasible: bool,
    pub algorithm: RouteAlgorithm,
    pub stops: Vec<ChargingFacility>,
    /// Road miles including the per-stop detour; absent when infeasible.
    pub road_miles: Option<f64>,
    /// Legs whose road distance exceeds the range limit.
    pub legs_over_range: usize,
    pub cost: Option<TripCostResult>,
    /// Empty when infeasible.
    pub legs: Vec<RoutedLeg>,
}

impl ElectricOutcome {
    fn infeasible(algorithm: RouteAlgorithm) -> Self {
        Self {
            feasible: false,
            algorithm,
            stops: Vec::new(),
            road_miles: None,
            legs_over_range: 0,
            cost: None,
            legs: Vec::new(),
        }
    }
}

/// Full comparison for one trip.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripReport {
    pub origin: ResolvedPlace,
    pub destination: ResolvedPlace,
    pub trips_per_year: u32,
    pub max_leg_miles: f64,
    pub diesel: DieselOutcome,
    pub electric: ElectricOutcome,
    pub diesel_price: DieselPrice,
}

fn line_feature(points: &[GeoPoint], properties: Value) -> Value {
    let coordinates: Vec<[f64; 2]> = points.iter().map(GeoPoint::lon_lat).collect();
    json!({
        "type": "Feature",
        "geometry": {"type": "LineString", "coordinates": coordinates},
        "properties": properties,
    })
}

fn point_feature(point: GeoPoint, properties: Value) -> Value {
    json!({
        "type": "Feature",
        "geometry": {"type": "Point", "coordinates": point.lon_lat()},
        "properties": properties,
    })
}

impl TripReport {
    /// Map overlay of the trip as a GeoJSON `FeatureCollection`.
    ///
    /// Features carry a `kind` property: `origin`, `destination`, `diesel_route`,
    /// `electric_leg` or `charger`.
    pub fn to_geojson(&self) -> Value {
        let mut features = vec![
            point_feature(
                self.origin.point,
                json!({"kind": "origin", "label": self.origin.label}),
            ),
            point_feature(
                self.destination.point,
                json!({"kind": "destination", "label": self.destination.label}),
            ),
            line_feature(
                &self.diesel.geometry,
                json!({"kind": "diesel_route", "road_miles": self.diesel.road_miles}),
            ),
        ];
        for (index, leg) in self.electric.legs.iter().enumerate() {
            features.push(line_feature(
                &leg.geometry,
                json!({"kind": "electric_leg", "leg": index, "road_miles": leg.road_miles}),
            ));
        }
        for stop in &self.electric.stops {
            features.push(point_feature(
                stop.location,
                json!({"kind": "charger", "id": stop.id, "name": stop.name}),
            ));
        }
        json!({"type": "FeatureCollection", "features": features})
    }
}

/// Every road router failure surfaces as [`Error::Routing`].
fn routing_failure(err: Error, what: &str) -> Error {
    match err {
        Error::Routing { .. } => err,
        other => Error::Routing {
            message: format!("{what}: {other}"),
        },
    }
}

/// Road distances rounded to a tenth of a mile.
fn round_tenth(miles: f64) -> f64 {
    (miles * 10.0).round() / 10.0
}

/// Orchestrates one trip request across the collaborators.
#[derive(Clone)]
pub struct RoutePlanningService {
    context: PlanningContext,
    geocoder: Arc<dyn Geocoder>,
    router: Arc<dyn RoadRouter>,
    price_source: Arc<dyn PriceSource>,
    config: ServiceConfig,
}

impl RoutePlanningService {
    pub fn new(
        context: PlanningContext,
        geocoder: Arc<dyn Geocoder>,
        router: Arc<dyn RoadRouter>,
        price_source: Arc<dyn PriceSource>,
        config: ServiceConfig,
    ) -> Self {
        Self {
            context,
            geocoder,
            router,
            price_source,
            config,
        }
    }

    pub fn context(&self) -> &PlanningContext {
        &self.context
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Plan and price a trip.
    ///
    /// An electric route that the network cannot support is reported with
    /// `feasible == false`; it is not an error.
    ///
    /// # Errors
    /// - [`Error::InvalidParameter`] for a malformed query, or when both places
    ///   resolve to the same point.
    /// - [`Error::PlaceNotFound`] when either place has no geocoder match.
    /// - [`Error::Routing`] (or the transport error) when any road call fails.
    pub fn plan_trip(&self, query: &TripQuery) -> Result<TripReport> {
        query.validate()?;
        let algorithm = query.algorithm.unwrap_or(self.config.algorithm);
        let max_leg = self.config.max_leg_miles;

        let cache = self.context.geocode_cache();
        let origin = cache.resolve(&query.from, self.geocoder.as_ref())?;
        let destination = cache.resolve(&query.to, self.geocoder.as_ref())?;
        debug!(origin = %origin.label, destination = %destination.label, "resolved places");

        let diesel_leg = self
            .router
            .route(origin.point, destination.point, self.config.diesel_profile)
            .map_err(|e| routing_failure(e, "diesel route"))?;
        let diesel_miles = round_tenth(meters_to_miles(diesel_leg.distance_meters));
        if diesel_miles <= 0.0 {
            return Err(Error::invalid(
                "to",
                "origin and destination resolve to the same place",
            ));
        }

        let request = RouteRequest::new(origin.point, destination.point, max_leg)
            .with_algorithm(algorithm)
            .with_trips(
                query.trips_per_year,
                query.economy.unwrap_or(DEFAULT_DIESEL_MPG),
            );

        let electric_plan = if diesel_miles <= max_leg {
            None
        } else {
            Some(plan_route(self.context.network(), &request)?)
        };

        let diesel_price = self.diesel_price();
        let diesel_cost = estimate(
            diesel_miles,
            request.trips_per_year,
            request.economy,
            &CostProfile::diesel(diesel_price.per_gallon),
        )?;

        let electric = match electric_plan {
            // The diesel road leg already fits in range, so it doubles as the electric route.
            None => ElectricOutcome {
                feasible: true,
                algorithm,
                stops: Vec::new(),
                road_miles: Some(diesel_miles),
                legs_over_range: 0,
                cost: Some(self.electric_cost(diesel_miles, request.trips_per_year)?),
                legs: vec![RoutedLeg {
                    from: origin.point,
                    to: destination.point,
                    road_miles: diesel_miles,
                    geometry: diesel_leg.geometry.clone(),
                }],
            },
            Some(plan) if !plan.feasible => {
                info!(
                    origin = %origin.label,
                    destination = %destination.label,
                    max_leg,
                    %algorithm,
                    "electric route infeasible with current charging network"
                );
                ElectricOutcome::infeasible(algorithm)
            }
            Some(plan) => self.route_electric(plan, max_leg, request.trips_per_year)?,
        };

        info!(
            origin = %origin.label,
            destination = %destination.label,
            diesel_miles,
            electric_miles = ?electric.road_miles,
            stops = electric.stops.len(),
            "trip planned"
        );

        Ok(TripReport {
            origin,
            destination,
            trips_per_year: request.trips_per_year,
            max_leg_miles: max_leg,
            diesel: DieselOutcome {
                road_miles: diesel_miles,
                cost: diesel_cost,
                geometry: diesel_leg.geometry,
            },
            electric,
            diesel_price,
        })
    }

    fn route_electric(&self, plan: RoutePlan, max_leg: f64, trips: u32) -> Result<ElectricOutcome> {
        let mut meters = 0.0;
        let mut legs_over_range = 0;
        let mut legs = Vec::with_capacity(plan.leg_count());

        for (index, (from, to)) in plan.legs().enumerate() {
            let leg = self
                .router
                .route(from, to, self.config.electric_profile)
                .map_err(|e| routing_failure(e, &format!("electric leg {index} ({from} -> {to})")))?;
            let leg_miles = meters_to_miles(leg.distance_meters);
            if leg_miles > max_leg {
                warn!(
                    leg = index,
                    road_miles = leg_miles,
                    max_leg,
                    "road distance exceeds range on a planned leg"
                );
                legs_over_range += 1;
            }
            meters += leg.distance_meters;
            legs.push(RoutedLeg {
                from,
                to,
                road_miles: round_tenth(leg_miles),
                geometry: leg.geometry,
            });
        }

        let detour = plan.stop_count() as f64 * self.config.detour_miles_per_stop;
        let road_miles = round_tenth(meters_to_miles(meters) + detour);
        let cost = self.electric_cost(road_miles, trips)?;

        Ok(ElectricOutcome {
            feasible: true,
            algorithm: plan.algorithm,
            stops: plan.stops,
            road_miles: Some(road_miles),
            legs_over_range,
            cost: Some(cost),
            legs,
        })
    }

    fn electric_cost(&self, miles: f64, trips: u32) -> Result<TripCostResult> {
        estimate_with_default_economy(miles, trips, &CostProfile::electric())
    }

    fn diesel_price(&self) -> DieselPrice {
        match self.price_source.diesel_price_per_gallon() {
            Ok(price) if price.is_finite() && price > 0.0 => DieselPrice {
                per_gallon: price,
                provenance: PriceProvenance::Live,
            },
            Ok(price) => {
                warn!(price, "price source returned an unusable diesel price, using fallback");
                self.fallback_price()
            }
            Err(err) => {
                warn!(error = %err, "diesel price lookup failed, using fallback");
                self.fallback_price()
            }
        }
    }

    fn fallback_price(&self) -> DieselPrice {
        DieselPrice {
            per_gallon: self.config.fallback_diesel_price,
            provenance: PriceProvenance::Fallback,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_to_tenth() {
        assert_eq!(round_tenth(2446.349), 2446.3);
        assert_eq!(round_tenth(12.36), 12.4);
    }

    #[test]
    fn query_validation() {
        assert!(TripQuery::new("a", "b").validate().is_ok());
        assert!(TripQuery::new(" ", "b").validate().is_err());
        assert!(TripQuery::new("a", "b").with_trips(0).validate().is_err());
        assert!(TripQuery::new("a", "b").with_economy(-1.0).validate().is_err());
    }

    #[test]
    fn default_config_matches_constants() {
        let config = ServiceConfig::default();
        assert_eq!(config.max_leg_miles, 225.0);
        assert_eq!(config.electric_profile, RoadProfile::Car);
        assert_eq!(config.diesel_profile, RoadProfile::HeavyGoods);
        assert_eq!(config.detour_miles_per_stop, 1.0);
    }
}
