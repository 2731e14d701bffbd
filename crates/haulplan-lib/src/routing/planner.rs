//! Planning strategies implementing the Strategy pattern.
//!
//! Strategies only decide which charging facilities to stop at; the
//! within-range shortcut and plan assembly live in [`super::plan_route`].

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet};

use tracing::trace;

use crate::geo::{haversine_miles, GeoPoint};
use crate::network::{ChargingNetwork, FacilityId};

use super::RouteAlgorithm;

/// Trait for charging-stop selection strategies.
pub trait RoutePlanner: Send + Sync {
    /// The algorithm identifier for this planner.
    fn algorithm(&self) -> RouteAlgorithm;

    /// Choose the ordered charging stops between `origin` and `destination`.
    ///
    /// Callers guarantee the destination is out of direct range. Returns `None`
    /// when no sequence keeps every leg within `max_leg`.
    fn find_stops(
        &self,
        network: &ChargingNetwork,
        origin: GeoPoint,
        destination: GeoPoint,
        max_leg: f64,
    ) -> Option<Vec<FacilityId>>;
}

/// Greedy best-progress planner.
///
/// From the current position, moves to the reachable unvisited facility
/// closest to the destination. Not guaranteed to find the shortest or
/// fewest-stop route, but deterministic and `O(stops × |network|)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedyPlanner;

impl RoutePlanner for GreedyPlanner {
    fn algorithm(&self) -> RouteAlgorithm {
        RouteAlgorithm::Greedy
    }

    fn find_stops(
        &self,
        network: &ChargingNetwork,
        origin: GeoPoint,
        destination: GeoPoint,
        max_leg: f64,
    ) -> Option<Vec<FacilityId>> {
        let mut current = origin;
        let mut remaining = haversine_miles(current, destination);
        let mut visited: HashSet<FacilityId> = HashSet::new();
        let mut stops = Vec::new();

        while remaining > max_leg {
            // Strict `<` keeps the first facility in load order on ties.
            let best = network
                .reachable(current, max_leg, &visited)
                .map(|f| (f, haversine_miles(f.location, destination)))
                .fold(None, |best, candidate| match best {
                    Some((_, d)) if d <= candidate.1 => best,
                    _ => Some(candidate),
                });

            let (facility, to_goal) = best?;

            // No progress toward the goal means the search would cycle.
            if to_goal >= remaining {
                trace!(facility = facility.id, to_goal, remaining, "no progress possible");
                return None;
            }

            trace!(facility = facility.id, to_goal, "selected charging stop");
            visited.insert(facility.id);
            stops.push(facility.id);
            current = facility.location;
            remaining = to_goal;
        }

        Some(stops)
    }
}

/// Shortest-path planner over the range-limited charging graph.
///
/// Nodes are the origin, the destination and every facility; an edge exists
/// when the great-circle distance is within range and is weighted by that
/// distance. Edges are evaluated lazily, so a search is `O(|network|²)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DijkstraPlanner;

/// Heap entry; ordered so that `BinaryHeap` pops the smallest cost first and
/// the lowest node index on equal cost.
#[derive(Debug, Clone, Copy)]
struct Frontier {
    cost: f64,
    node: usize,
}

impl PartialEq for Frontier {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Frontier {}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Frontier {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl RoutePlanner for DijkstraPlanner {
    fn algorithm(&self) -> RouteAlgorithm {
        RouteAlgorithm::Dijkstra
    }

    fn find_stops(
        &self,
        network: &ChargingNetwork,
        origin: GeoPoint,
        destination: GeoPoint,
        max_leg: f64,
    ) -> Option<Vec<FacilityId>> {
        // Facilities occupy 0..n, then the origin and destination.
        let n = network.len();
        let source = n;
        let target = n + 1;
        let position = |node: usize| -> GeoPoint {
            if node == source {
                origin
            } else if node == target {
                destination
            } else {
                network.get(node).map(|f| f.location).unwrap_or(origin)
            }
        };

        let mut dist = vec![f64::INFINITY; n + 2];
        let mut previous: Vec<Option<usize>> = vec![None; n + 2];
        let mut settled = vec![false; n + 2];
        let mut heap = BinaryHeap::new();

        dist[source] = 0.0;
        heap.push(Frontier {
            cost: 0.0,
            node: source,
        });

        while let Some(Frontier { cost, node }) = heap.pop() {
            if settled[node] {
                continue;
            }
            settled[node] = true;
            if node == target {
                break;
            }

            let here = position(node);
            for next in (0..n).chain(std::iter::once(target)) {
                if settled[next] {
                    continue;
                }
                let leg = haversine_miles(here, position(next));
                if leg > max_leg {
                    continue;
                }
                let candidate = cost + leg;
                if candidate < dist[next] {
                    dist[next] = candidate;
                    previous[next] = Some(node);
                    heap.push(Frontier {
                        cost: candidate,
                        node: next,
                    });
                }
            }
        }

        if !settled[target] {
            return None;
        }

        let mut stops = Vec::new();
        let mut cursor = previous[target];
        while let Some(node) = cursor {
            if node == source {
                break;
            }
            stops.push(node);
            cursor = previous[node];
        }
        stops.reverse();
        trace!(stops = stops.len(), miles = dist[target], "shortest charging route");
        Some(stops)
    }
}

/// Select the planner for an algorithm.
pub fn select_planner(algorithm: RouteAlgorithm) -> Box<dyn RoutePlanner> {
    match algorithm {
        RouteAlgorithm::Greedy => Box::new(GreedyPlanner),
        RouteAlgorithm::Dijkstra => Box::new(DijkstraPlanner),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn planners_report_their_algorithm() {
        assert_eq!(GreedyPlanner.algorithm(), RouteAlgorithm::Greedy);
        assert_eq!(DijkstraPlanner.algorithm(), RouteAlgorithm::Dijkstra);
        assert_eq!(
            select_planner(RouteAlgorithm::Dijkstra).algorithm(),
            RouteAlgorithm::Dijkstra
        );
    }

    #[test]
    fn frontier_pops_lowest_cost_first() {
        let mut heap = BinaryHeap::new();
        heap.push(Frontier { cost: 5.0, node: 1 });
        heap.push(Frontier { cost: 1.0, node: 2 });
        heap.push(Frontier { cost: 1.0, node: 0 });
        assert_eq!(heap.pop().map(|f| f.node), Some(0));
        assert_eq!(heap.pop().map(|f| f.node), Some(2));
        assert_eq!(heap.pop().map(|f| f.node), Some(1));
    }

    #[test]
    fn greedy_stops_when_no_candidate_makes_progress() {
        // Only station lies behind the origin.
        let network = ChargingNetwork::from_points([GeoPoint::new(0.0, -1.0)]);
        let stops = GreedyPlanner.find_stops(
            &network,
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(0.0, 10.0),
            100.0,
        );
        assert!(stops.is_none());
    }

    #[test]
    fn dijkstra_handles_empty_network() {
        let stops = DijkstraPlanner.find_stops(
            &ChargingNetwork::default(),
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(0.0, 10.0),
            100.0,
        );
        assert!(stops.is_none());
    }
}
