//! Operating cost and emissions model.
//!
//! - [`constants`] - Business constants for both propulsion models
//! - [`estimator`] - [`CostProfile`], [`estimate`] and [`TripCostResult`]

pub mod constants;
pub mod estimator;

pub use constants::{
    CHARGING_DETOUR_MILES, DEFAULT_DIESEL_MPG, DIESEL_FALLBACK_PRICE_PER_GALLON,
    ELECTRIC_MILES_PER_KWH, ELECTRIC_PRICE_PER_KWH,
};
pub use estimator::{
    estimate, estimate_with_default_economy, CostProfile, PropulsionKind, TripCostResult,
};
