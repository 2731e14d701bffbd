//! Business constants used by the cost and emissions model.

/// Diesel price used when the live price feed is unavailable ($ per gallon).
pub const DIESEL_FALLBACK_PRICE_PER_GALLON: f64 = 3.80;
/// Default diesel economy in miles per gallon.
pub const DEFAULT_DIESEL_MPG: f64 = 6.5;
/// Lifetime maintenance budget for a diesel tractor ($).
pub const DIESEL_MAINTENANCE_BUDGET: f64 = 18_000.0;
/// Depreciable value of a diesel tractor ($).
pub const DIESEL_DEPRECIATION_BUDGET: f64 = 150_000.0;
/// Expected service life of a diesel tractor (miles).
pub const DIESEL_LIFETIME_MILES: f64 = 750_000.0;
/// Tailpipe emissions for diesel (kg CO2e per mile).
pub const DIESEL_EMISSIONS_KG_PER_MILE: f64 = 1.61;

/// Commercial charging price ($ per kWh).
pub const ELECTRIC_PRICE_PER_KWH: f64 = 0.18;
/// Energy economy of a battery-electric tractor (miles per kWh).
pub const ELECTRIC_MILES_PER_KWH: f64 = 0.5;
/// Lifetime maintenance budget for a battery-electric tractor ($).
pub const ELECTRIC_MAINTENANCE_BUDGET: f64 = 12_000.0;
/// Depreciable value of a battery-electric tractor ($).
pub const ELECTRIC_DEPRECIATION_BUDGET: f64 = 250_000.0;
/// Expected service life of a battery-electric tractor (miles).
pub const ELECTRIC_LIFETIME_MILES: f64 = 500_000.0;
/// Grid-average emissions for electric operation (kg CO2e per mile).
pub const ELECTRIC_EMISSIONS_KG_PER_MILE: f64 = 0.45;

/// Road miles added per charging stop for the detour to the charger.
pub const CHARGING_DETOUR_MILES: f64 = 1.0;
