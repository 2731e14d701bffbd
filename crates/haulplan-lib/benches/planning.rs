use criterion::{criterion_group, criterion_main, Criterion};
use haulplan_lib::{
    estimate, plan_route, ChargingNetwork, CostProfile, GeoPoint, RouteAlgorithm, RouteRequest,
};
use once_cell::sync::Lazy;
use std::hint::black_box;
use std::path::PathBuf;

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../docs/fixtures/charging_stations.csv")
}

const LOS_ANGELES: GeoPoint = GeoPoint::new(34.05, -118.25);
const NEW_YORK: GeoPoint = GeoPoint::new(40.71, -74.00);

static CORRIDOR: Lazy<ChargingNetwork> =
    Lazy::new(|| ChargingNetwork::from_path(&fixture_path()).expect("fixture loads"));

// Dense synthetic grid over the continental US, one charger per half degree.
static GRID: Lazy<ChargingNetwork> = Lazy::new(|| {
    let points = (0..50).flat_map(|i| {
        (0..120).map(move |j| GeoPoint::new(25.0 + i as f64 * 0.5, -125.0 + j as f64 * 0.5))
    });
    ChargingNetwork::from_points(points)
});

static GREEDY_REQUEST: Lazy<RouteRequest> =
    Lazy::new(|| RouteRequest::new(LOS_ANGELES, NEW_YORK, 225.0));
static DIJKSTRA_REQUEST: Lazy<RouteRequest> = Lazy::new(|| {
    RouteRequest::new(LOS_ANGELES, NEW_YORK, 225.0).with_algorithm(RouteAlgorithm::Dijkstra)
});

fn benchmark_planning(c: &mut Criterion) {
    c.bench_function("greedy_corridor_la_ny", |b| {
        let network = &*CORRIDOR;
        let request = &*GREEDY_REQUEST;
        b.iter(|| {
            let plan = plan_route(network, request).expect("plan succeeds");
            black_box(plan.stop_count())
        });
    });

    c.bench_function("dijkstra_corridor_la_ny", |b| {
        let network = &*CORRIDOR;
        let request = &*DIJKSTRA_REQUEST;
        b.iter(|| {
            let plan = plan_route(network, request).expect("plan succeeds");
            black_box(plan.stop_count())
        });
    });

    c.bench_function("greedy_grid_la_ny", |b| {
        let network = &*GRID;
        let request = &*GREEDY_REQUEST;
        b.iter(|| {
            let plan = plan_route(network, request).expect("plan succeeds");
            black_box(plan.waypoints.len())
        });
    });

    c.bench_function("estimate_diesel", |b| {
        let profile = CostProfile::diesel(3.80);
        b.iter(|| black_box(estimate(black_box(2446.3), 50, 6.5, &profile).expect("valid")))
    });
}

criterion_group!(benches, benchmark_planning);
criterion_main!(benches);
