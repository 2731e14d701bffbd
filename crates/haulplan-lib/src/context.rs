//! Process-wide planning context.
//!
//! Holds the state shared by every request: the immutable charging network
//! and the geocode cache. Construct it once at startup and share it through
//! an [`Arc`].

use std::path::Path;
use std::sync::Arc;

use dashmap::DashMap;
use tracing::debug;

use crate::error::{Error, Result};
use crate::external::{Geocoder, ResolvedPlace};
use crate::network::ChargingNetwork;

/// Concurrent cache of successful geocoder lookups.
///
/// Keys are the trimmed, lowercased query. Misses are not cached.
#[derive(Debug, Default)]
pub struct GeocodeCache {
    entries: DashMap<String, ResolvedPlace>,
}

impl GeocodeCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key(query: &str) -> String {
        query.trim().to_lowercase()
    }

    pub fn get(&self, query: &str) -> Option<ResolvedPlace> {
        self.entries.get(&Self::key(query)).map(|entry| entry.value().clone())
    }

    pub fn insert(&self, query: &str, place: ResolvedPlace) {
        self.entries.insert(Self::key(query), place);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolve `query`, consulting the cache before the geocoder.
    ///
    /// # Errors
    /// [`Error::InvalidParameter`] for a blank query, [`Error::PlaceNotFound`]
    /// when the geocoder has no match, or the geocoder's own error.
    pub fn resolve(&self, query: &str, geocoder: &dyn Geocoder) -> Result<ResolvedPlace> {
        let key = Self::key(query);
        if key.is_empty() {
            return Err(Error::invalid("location", "must not be empty"));
        }
        if let Some(hit) = self.entries.get(&key) {
            debug!(query = %key, "geocode cache hit");
            return Ok(hit.value().clone());
        }

        let place = geocoder
            .geocode(query.trim())?
            .ok_or_else(|| Error::PlaceNotFound {
                query: query.trim().to_string(),
            })?;
        self.entries.insert(key, place.clone());
        Ok(place)
    }
}

/// Shared state for trip planning.
#[derive(Debug, Clone)]
pub struct PlanningContext {
    network: Arc<ChargingNetwork>,
    geocode_cache: Arc<GeocodeCache>,
}

impl PlanningContext {
    pub fn new(network: ChargingNetwork) -> Self {
        Self::from_shared(Arc::new(network))
    }

    pub fn from_shared(network: Arc<ChargingNetwork>) -> Self {
        Self {
            network,
            geocode_cache: Arc::new(GeocodeCache::new()),
        }
    }

    /// Load the charging network from CSV files and build a context.
    pub fn load<P: AsRef<Path>>(paths: &[P]) -> Result<Self> {
        Ok(Self::new(ChargingNetwork::from_paths(paths)?))
    }

    pub fn network(&self) -> &ChargingNetwork {
        &self.network
    }

    pub fn shared_network(&self) -> Arc<ChargingNetwork> {
        Arc::clone(&self.network)
    }

    pub fn geocode_cache(&self) -> &GeocodeCache {
        &self.geocode_cache
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::geo::GeoPoint;

    struct CountingGeocoder {
        calls: AtomicUsize,
    }

    impl Geocoder for CountingGeocoder {
        fn geocode(&self, query: &str) -> Result<Option<ResolvedPlace>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if query.eq_ignore_ascii_case("atlantis") {
                return Ok(None);
            }
            Ok(Some(ResolvedPlace::new(query, GeoPoint::new(1.0, 2.0))))
        }
    }

    #[test]
    fn cache_key_is_normalized() {
        let cache = GeocodeCache::new();
        let geocoder = CountingGeocoder {
            calls: AtomicUsize::new(0),
        };
        cache.resolve("  Denver, CO ", &geocoder).unwrap();
        cache.resolve("denver, co", &geocoder).unwrap();
        assert_eq!(geocoder.calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.len(), 1);
        assert!(cache.get("DENVER, CO").is_some());
    }

    #[test]
    fn misses_are_not_cached() {
        let cache = GeocodeCache::new();
        let geocoder = CountingGeocoder {
            calls: AtomicUsize::new(0),
        };
        for _ in 0..2 {
            let err = cache.resolve("Atlantis", &geocoder).unwrap_err();
            assert!(matches!(err, Error::PlaceNotFound { .. }));
        }
        assert_eq!(geocoder.calls.load(Ordering::SeqCst), 2);
        assert!(cache.is_empty());
    }

    #[test]
    fn blank_query_is_invalid() {
        let cache = GeocodeCache::new();
        let geocoder = CountingGeocoder {
            calls: AtomicUsize::new(0),
        };
        assert!(matches!(
            cache.resolve("   ", &geocoder).unwrap_err(),
            Error::InvalidParameter { .. }
        ));
    }

    #[test]
    fn clones_share_network_and_cache() {
        let context = PlanningContext::new(ChargingNetwork::from_points([GeoPoint::new(0.0, 0.0)]));
        let clone = context.clone();
        context
            .geocode_cache()
            .insert("x", ResolvedPlace::new("X", GeoPoint::new(0.0, 0.0)));
        assert_eq!(clone.geocode_cache().len(), 1);
        assert_eq!(clone.network().len(), 1);
    }
}
