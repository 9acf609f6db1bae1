// Library exports for testing and reusability

pub mod cache;
pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod registry;
pub mod routes;
pub mod services;
pub mod surface;

// Re-export commonly used types
pub use error::{AppError, Result};

use cache::{GeocodeCache, MemoryCacheService};
use config::{Config, LoopGeneratorConfig};
use constants::DEFAULT_MEMORY_CACHE_MAX_ENTRIES;
use registry::LoopRegistry;
use services::geocoding::{CachingGeocoder, Geocoder, NominatimClient};
use services::loop_orchestrator::LoopOrchestrator;
use services::osrm::{OsrmClient, RoutingService};
use std::sync::Arc;
use std::time::Duration;
use surface::GeoJsonSurface;

// App state for sharing across the application
pub struct AppState {
    pub orchestrator: LoopOrchestrator,
    pub geocoder: Arc<dyn Geocoder>,
    pub registry: Arc<LoopRegistry>,
    pub surface: Arc<GeoJsonSurface>,
    pub cache: Option<Arc<dyn GeocodeCache>>,
    pub loop_config: LoopGeneratorConfig,
}

impl AppState {
    /// Wire the state around the given collaborators.
    pub fn with_services(
        geocoder: Arc<dyn Geocoder>,
        router: Arc<dyn RoutingService>,
        surface: Arc<GeoJsonSurface>,
        cache: Option<Arc<dyn GeocodeCache>>,
        loop_config: LoopGeneratorConfig,
    ) -> Self {
        let registry = Arc::new(LoopRegistry::new());
        let orchestrator = LoopOrchestrator::new(
            geocoder.clone(),
            router,
            registry.clone(),
            surface.clone(),
            &loop_config,
        );

        AppState {
            orchestrator,
            geocoder,
            registry,
            surface,
            cache,
            loop_config,
        }
    }

    /// Production wiring: Nominatim behind an in-memory cache, OSRM, and a
    /// GeoJSON surface attached at the configured default view.
    pub fn from_config(config: &Config) -> Result<Self> {
        let timeout = config.http_timeout_secs.map(Duration::from_secs);

        let cache: Arc<dyn GeocodeCache> = Arc::new(MemoryCacheService::new(
            config.geocode_cache_ttl,
            DEFAULT_MEMORY_CACHE_MAX_ENTRIES,
        ));
        let nominatim = NominatimClient::new(
            config.nominatim_base_url.clone(),
            &config.user_agent,
            timeout,
        )?;
        let geocoder: Arc<dyn Geocoder> =
            Arc::new(CachingGeocoder::new(Arc::new(nominatim), cache.clone()));

        let router: Arc<dyn RoutingService> = Arc::new(OsrmClient::with_config(
            config.osrm_base_url.clone(),
            config.routing_profile,
            timeout,
        )?);

        let surface = Arc::new(GeoJsonSurface::attached(config.map_center, config.map_zoom));

        Ok(Self::with_services(
            geocoder,
            router,
            surface,
            Some(cache),
            config.loop_generator.clone(),
        ))
    }
}
