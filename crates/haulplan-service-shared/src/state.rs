//! Application state shared by axum handlers.
//!
//! The charging network is loaded once at startup and wrapped together with
//! the external collaborators in a [`RoutePlanningService`].

use std::path::PathBuf;
use std::sync::Arc;

use haulplan_lib::{
    ChargingNetwork, Error as LibError, ExternalConfig, Geocoder, PlanningContext, PriceSource,
    RoadRouter, RoutePlanningService, ServiceConfig,
};

/// Error during application state initialization.
#[derive(Debug)]
pub enum AppStateError {
    /// No charging station files were configured.
    StationsNotConfigured,

    /// A station file does not exist.
    StationsNotFound(String),

    /// Failed to load the charging network.
    NetworkLoad(LibError),

    /// Failed to build an external collaborator client.
    Collaborator(LibError),
}

impl std::fmt::Display for AppStateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StationsNotConfigured => write!(f, "no charging station files configured"),
            Self::StationsNotFound(path) => write!(f, "charging station file not found: {}", path),
            Self::NetworkLoad(e) => write!(f, "failed to load charging network: {}", e),
            Self::Collaborator(e) => write!(f, "failed to build external client: {}", e),
        }
    }
}

impl std::error::Error for AppStateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::NetworkLoad(e) | Self::Collaborator(e) => Some(e),
            _ => None,
        }
    }
}

/// Shared application state for all axum handlers.
///
/// Cheaply cloneable; share it via axum's `State` extractor and move clones
/// into `spawn_blocking` for the blocking collaborator calls.
///
/// ```ignore
/// use axum::{extract::State, routing::post, Router};
/// use haulplan_service_shared::AppState;
///
/// async fn handler(State(state): State<AppState>) {
///     let stations = state.network().len();
/// }
///
/// let state = AppState::load(&paths, &ExternalConfig::from_env(), ServiceConfig::default())?;
/// let app = Router::new()
///     .route("/api/v1/trip", post(handler))
///     .with_state(state);
/// ```
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    service: RoutePlanningService,
}

impl AppState {
    /// Load the charging network from `paths` and connect the live
    /// collaborators described by `external`.
    pub fn load(
        paths: &[PathBuf],
        external: &ExternalConfig,
        config: ServiceConfig,
    ) -> Result<Self, AppStateError> {
        if paths.is_empty() {
            return Err(AppStateError::StationsNotConfigured);
        }
        if let Some(missing) = paths.iter().find(|path| !path.exists()) {
            return Err(AppStateError::StationsNotFound(
                missing.display().to_string(),
            ));
        }

        tracing::info!(files = paths.len(), "loading charging network");
        let context = PlanningContext::load(paths).map_err(AppStateError::NetworkLoad)?;
        let report = context.network().load_report();
        tracing::info!(
            stations = report.loaded,
            skipped = report.skipped,
            duplicates = report.duplicates,
            "charging network loaded"
        );

        let geocoder = external.geocoder().map_err(AppStateError::Collaborator)?;
        let router = external
            .road_router()
            .map_err(AppStateError::Collaborator)?;
        let price_source = external
            .price_source()
            .map_err(AppStateError::Collaborator)?;

        Ok(Self::from_components(
            context,
            geocoder,
            router,
            price_source,
            config,
        ))
    }

    /// Build state from pre-constructed collaborators; used by tests and by
    /// callers that bring their own clients.
    pub fn from_components(
        context: PlanningContext,
        geocoder: Arc<dyn Geocoder>,
        router: Arc<dyn RoadRouter>,
        price_source: Arc<dyn PriceSource>,
        config: ServiceConfig,
    ) -> Self {
        Self::from_service(RoutePlanningService::new(
            context,
            geocoder,
            router,
            price_source,
            config,
        ))
    }

    pub fn from_service(service: RoutePlanningService) -> Self {
        Self {
            inner: Arc::new(AppStateInner { service }),
        }
    }

    pub fn service(&self) -> &RoutePlanningService {
        &self.inner.service
    }

    pub fn network(&self) -> &ChargingNetwork {
        self.inner.service.context().network()
    }

    pub fn config(&self) -> &ServiceConfig {
        self.inner.service.config()
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("station_count", &self.network().len())
            .field("max_leg_miles", &self.config().max_leg_miles)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{fixture_stations_path, test_state};

    #[test]
    fn test_app_state_from_components() {
        let state = test_state();
        assert!(!state.network().is_empty());
        assert_eq!(state.config().max_leg_miles, 225.0);
    }

    #[test]
    fn test_app_state_clone_shares_network() {
        let state1 = test_state();
        let state2 = state1.clone();
        assert!(std::ptr::eq(state1.network(), state2.network()));
    }

    #[test]
    fn test_app_state_debug() {
        let debug = format!("{:?}", test_state());
        assert!(debug.contains("AppState"));
        assert!(debug.contains("station_count"));
    }

    #[test]
    fn test_app_state_load_requires_paths() {
        let result = AppState::load(&[], &ExternalConfig::default(), ServiceConfig::default());
        assert!(matches!(result, Err(AppStateError::StationsNotConfigured)));
    }

    #[test]
    fn test_app_state_load_nonexistent() {
        let result = AppState::load(
            &[PathBuf::from("/nonexistent/stations.csv")],
            &ExternalConfig::default(),
            ServiceConfig::default(),
        );
        match result {
            Err(AppStateError::StationsNotFound(path)) => assert!(path.contains("nonexistent")),
            other => panic!("unexpected result: {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_app_state_load_requires_router_key() {
        let result = AppState::load(
            &[fixture_stations_path()],
            &ExternalConfig::default(),
            ServiceConfig::default(),
        );
        let err = result.map(|_| ()).unwrap_err();
        assert!(matches!(err, AppStateError::Collaborator(_)));
        assert!(err.to_string().contains("ORS_API_KEY"));
    }
}
