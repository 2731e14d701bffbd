//! Annualized operating cost and emissions estimation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

use super::constants::*;

/// Propulsion model a [`CostProfile`] describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropulsionKind {
    Diesel,
    Electric,
}

impl fmt::Display for PropulsionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PropulsionKind::Diesel => "diesel",
            PropulsionKind::Electric => "electric",
        })
    }
}

impl FromStr for PropulsionKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "diesel" => Ok(PropulsionKind::Diesel),
            "electric" | "ev" => Ok(PropulsionKind::Electric),
            other => Err(Error::invalid(
                "profile",
                format!("unknown profile '{other}', expected diesel or electric"),
            )),
        }
    }
}

/// Constant table for one propulsion model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CostProfile {
    pub kind: PropulsionKind,
    /// Price per gallon (diesel) or per kWh (electric).
    pub energy_price: f64,
    /// Miles per gallon (diesel) or miles per kWh (electric).
    pub default_economy: f64,
    pub maintenance_budget: f64,
    pub depreciation_budget: f64,
    pub lifetime_miles: f64,
    pub emission_factor_kg_per_mile: f64,
}

impl CostProfile {
    /// Diesel profile at the given pump price.
    pub fn diesel(price_per_gallon: f64) -> Self {
        Self {
            kind: PropulsionKind::Diesel,
            energy_price: price_per_gallon,
            default_economy: DEFAULT_DIESEL_MPG,
            maintenance_budget: DIESEL_MAINTENANCE_BUDGET,
            depreciation_budget: DIESEL_DEPRECIATION_BUDGET,
            lifetime_miles: DIESEL_LIFETIME_MILES,
            emission_factor_kg_per_mile: DIESEL_EMISSIONS_KG_PER_MILE,
        }
    }

    /// Battery-electric profile with the fixed charging price.
    pub fn electric() -> Self {
        Self {
            kind: PropulsionKind::Electric,
            energy_price: ELECTRIC_PRICE_PER_KWH,
            default_economy: ELECTRIC_MILES_PER_KWH,
            maintenance_budget: ELECTRIC_MAINTENANCE_BUDGET,
            depreciation_budget: ELECTRIC_DEPRECIATION_BUDGET,
            lifetime_miles: ELECTRIC_LIFETIME_MILES,
            emission_factor_kg_per_mile: ELECTRIC_EMISSIONS_KG_PER_MILE,
        }
    }

    fn validate(&self) -> Result<()> {
        if !self.energy_price.is_finite() || self.energy_price < 0.0 {
            return Err(Error::invalid(
                "energy_price",
                format!("must be finite and non-negative, got {}", self.energy_price),
            ));
        }
        let positive = [
            (self.lifetime_miles, "lifetime_miles"),
            (self.default_economy, "default_economy"),
        ];
        for (value, field) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::invalid(field, "must be finite and positive"));
            }
        }
        let non_negative = [
            (self.maintenance_budget, "maintenance_budget"),
            (self.depreciation_budget, "depreciation_budget"),
            (self.emission_factor_kg_per_mile, "emission_factor_kg_per_mile"),
        ];
        for (value, field) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::invalid(field, "must be finite and non-negative"));
            }
        }
        Ok(())
    }
}

/// Annualized cost and emissions for one propulsion model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TripCostResult {
    pub profile: PropulsionKind,
    pub annual_miles: f64,
    pub fuel_cost: f64,
    pub maintenance_cost: f64,
    pub depreciation_cost: f64,
    pub total_cost: f64,
    /// Metric tons of CO2-equivalent per year.
    pub emissions_tonnes: f64,
}

/// Estimate annual operating cost and emissions for a one-way trip.
///
/// Formulae, with `annual = one_way_miles × trips`:
/// - fuel = trips × (one_way_miles / economy) × energy_price
/// - maintenance = one_way_miles × (maintenance_budget / annual)
/// - depreciation = annual × (depreciation_budget / lifetime_miles)
/// - emissions = annual × emission_factor / 1000 (tonnes)
///
/// # Errors
/// [`Error::InvalidParameter`] when `trips` is zero, `one_way_miles` or
/// `economy` is not finite and positive, or the profile is malformed.
///
/// # Examples
/// ```
/// use haulplan_lib::cost::{estimate, CostProfile};
///
/// let result = estimate(500.0, 50, 9.0, &CostProfile::diesel(3.80)).unwrap();
/// assert!((result.maintenance_cost - 360.0).abs() < 1e-9);
/// assert!((result.emissions_tonnes - 40.25).abs() < 1e-9);
///
/// assert!(estimate(500.0, 0, 9.0, &CostProfile::diesel(3.80)).is_err());
/// ```
pub fn estimate(
    one_way_miles: f64,
    trips: u32,
    economy: f64,
    profile: &CostProfile,
) -> Result<TripCostResult> {
    if trips < 1 {
        return Err(Error::invalid("trips", "must be at least 1"));
    }
    if !one_way_miles.is_finite() || one_way_miles <= 0.0 {
        return Err(Error::invalid(
            "one_way_miles",
            format!("must be finite and positive, got {one_way_miles}"),
        ));
    }
    if !economy.is_finite() || economy <= 0.0 {
        return Err(Error::invalid(
            "economy",
            format!("must be finite and positive, got {economy}"),
        ));
    }
    profile.validate()?;

    let trips = f64::from(trips);
    let annual_miles = one_way_miles * trips;

    let fuel_cost = trips * (one_way_miles / economy) * profile.energy_price;
    let maintenance_cost = one_way_miles * (profile.maintenance_budget / annual_miles);
    let depreciation_cost = annual_miles * (profile.depreciation_budget / profile.lifetime_miles);
    let total_cost = fuel_cost + maintenance_cost + depreciation_cost;
    let emissions_tonnes = annual_miles * profile.emission_factor_kg_per_mile / 1000.0;

    Ok(TripCostResult {
        profile: profile.kind,
        annual_miles,
        fuel_cost,
        maintenance_cost,
        depreciation_cost,
        total_cost,
        emissions_tonnes,
    })
}

/// Estimate using the profile's default economy.
pub fn estimate_with_default_economy(
    one_way_miles: f64,
    trips: u32,
    profile: &CostProfile,
) -> Result<TripCostResult> {
    estimate(one_way_miles, trips, profile.default_economy, profile)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-6,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn diesel_regression_values() {
        let result = estimate(500.0, 50, 9.0, &CostProfile::diesel(3.80)).unwrap();
        assert_eq!(result.profile, PropulsionKind::Diesel);
        assert_close(result.annual_miles, 25_000.0);
        assert_close(result.fuel_cost, 10_555.555_555_6);
        assert_close(result.maintenance_cost, 360.0);
        assert_close(result.depreciation_cost, 5_000.0);
        assert_close(result.total_cost, 15_915.555_555_6);
        assert_close(result.emissions_tonnes, 40.25);
    }

    #[test]
    fn electric_uses_fixed_constants() {
        let profile = CostProfile::electric();
        let result = estimate_with_default_economy(500.0, 50, &profile).unwrap();
        // 50 × (500 / 0.5) × 0.18
        assert_close(result.fuel_cost, 9_000.0);
        assert_close(result.maintenance_cost, 240.0);
        // 25 000 × (250 000 / 500 000)
        assert_close(result.depreciation_cost, 12_500.0);
        assert_close(result.total_cost, 21_740.0);
        assert_close(result.emissions_tonnes, 11.25);
    }

    #[test]
    fn electric_emits_less_than_diesel() {
        let diesel = estimate(800.0, 10, 6.5, &CostProfile::diesel(3.8)).unwrap();
        let electric = estimate_with_default_economy(800.0, 10, &CostProfile::electric()).unwrap();
        assert!(electric.emissions_tonnes < diesel.emissions_tonnes);
    }

    #[test]
    fn zero_trips_is_invalid() {
        let err = estimate(500.0, 0, 9.0, &CostProfile::diesel(3.80)).unwrap_err();
        assert!(matches!(err, Error::InvalidParameter { parameter: "trips", .. }));
    }

    #[test]
    fn non_positive_distance_is_invalid() {
        for miles in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let err = estimate(miles, 1, 9.0, &CostProfile::diesel(3.80)).unwrap_err();
            assert!(matches!(
                err,
                Error::InvalidParameter {
                    parameter: "one_way_miles",
                    ..
                }
            ));
        }
    }

    #[test]
    fn non_positive_economy_is_invalid() {
        let err = estimate(100.0, 1, 0.0, &CostProfile::diesel(3.80)).unwrap_err();
        assert!(matches!(err, Error::InvalidParameter { parameter: "economy", .. }));
    }

    #[test]
    fn malformed_price_is_invalid() {
        let err = estimate(100.0, 1, 6.5, &CostProfile::diesel(f64::NAN)).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidParameter {
                parameter: "energy_price",
                ..
            }
        ));
    }

    #[test]
    fn profile_kind_parses() {
        assert_eq!("EV".parse::<PropulsionKind>().unwrap(), PropulsionKind::Electric);
        assert_eq!("diesel".parse::<PropulsionKind>().unwrap(), PropulsionKind::Diesel);
        assert!("hydrogen".parse::<PropulsionKind>().is_err());
    }
}
