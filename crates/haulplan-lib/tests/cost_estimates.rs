use haulplan_lib::cost::{estimate_with_default_economy, DEFAULT_DIESEL_MPG};
use haulplan_lib::{estimate, CostProfile, Error, PropulsionKind};

fn assert_close(actual: f64, expected: f64, tolerance: f64) {
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn diesel_regression_matches_published_figures() {
    let result = estimate(500.0, 50, 9.0, &CostProfile::diesel(3.80)).expect("estimate");
    assert_eq!(result.profile, PropulsionKind::Diesel);
    assert_close(result.fuel_cost, 10_555.5556, 1e-4);
    assert_close(result.maintenance_cost, 360.0, 1e-9);
    assert_close(result.depreciation_cost, 5_000.0, 1e-9);
    assert_close(result.total_cost, 15_915.5556, 1e-4);
    assert_close(result.emissions_tonnes, 40.25, 1e-9);
}

#[test]
fn total_is_sum_of_components() {
    for profile in [CostProfile::diesel(4.1), CostProfile::electric()] {
        let result = estimate_with_default_economy(1234.5, 17, &profile).unwrap();
        assert_close(
            result.total_cost,
            result.fuel_cost + result.maintenance_cost + result.depreciation_cost,
            1e-9,
        );
        assert!(result.total_cost.is_finite());
    }
}

#[test]
fn default_diesel_economy_is_used() {
    let profile = CostProfile::diesel(3.80);
    let defaulted = estimate_with_default_economy(650.0, 4, &profile).unwrap();
    let explicit = estimate(650.0, 4, DEFAULT_DIESEL_MPG, &profile).unwrap();
    assert_eq!(defaulted, explicit);
    // 4 × (650 / 6.5) × 3.80
    assert_close(defaulted.fuel_cost, 1_520.0, 1e-9);
}

#[test]
fn zero_trips_is_rejected() {
    let err = estimate(500.0, 0, 9.0, &CostProfile::diesel(3.80)).unwrap_err();
    assert!(matches!(err, Error::InvalidParameter { .. }));
    assert!(err.to_string().contains("trips"));
}
