use async_trait::async_trait;
use easyloop::config::LoopGeneratorConfig;
use easyloop::models::{GeoPoint, RoutedPath, WaypointPolygon};
use easyloop::services::geocoding::Geocoder;
use easyloop::services::osrm::RoutingService;
use easyloop::surface::GeoJsonSurface;
use easyloop::{AppError, AppState, Result};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

#[allow(dead_code)]
pub fn paris() -> GeoPoint {
    GeoPoint::new(48.8566, 2.3522).unwrap()
}

/// Geocoder that knows a single answer.
#[allow(dead_code)]
pub struct StubGeocoder {
    answer: Option<GeoPoint>,
    calls: AtomicUsize,
}

#[allow(dead_code)]
impl StubGeocoder {
    pub fn found(point: GeoPoint) -> Arc<Self> {
        Arc::new(Self {
            answer: Some(point),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn not_found() -> Arc<Self> {
        Arc::new(Self {
            answer: None,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Geocoder for StubGeocoder {
    async fn geocode(&self, _address: &str) -> Result<Option<GeoPoint>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.answer)
    }

    async fn reverse_geocode(&self, point: GeoPoint) -> Result<String> {
        Ok(format!("Near {}", point))
    }
}

/// What the scripted router answers for one call.
#[allow(dead_code)]
#[derive(Debug, Clone)]
pub enum Step {
    Route { distance_km: f64 },
    NoRoute,
    Fail,
}

/// Router that answers from a script, then routes successfully at 5.0km.
/// The returned path is the submitted polygon itself.
#[allow(dead_code)]
pub struct ScriptedRouter {
    script: Mutex<VecDeque<Step>>,
    submitted: Mutex<Vec<WaypointPolygon>>,
}

#[allow(dead_code)]
impl ScriptedRouter {
    pub fn new(steps: Vec<Step>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(steps.into()),
            submitted: Mutex::new(Vec::new()),
        })
    }

    pub fn always_ok() -> Arc<Self> {
        Self::new(Vec::new())
    }

    pub fn calls(&self) -> usize {
        self.submitted.lock().unwrap().len()
    }

    pub fn submitted(&self) -> Vec<WaypointPolygon> {
        self.submitted.lock().unwrap().clone()
    }
}

#[async_trait]
impl RoutingService for ScriptedRouter {
    async fn route(&self, waypoints: &WaypointPolygon) -> Result<Option<RoutedPath>> {
        self.submitted.lock().unwrap().push(waypoints.clone());

        let step = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Step::Route { distance_km: 5.0 });

        match step {
            Step::Route { distance_km } => Ok(Some(RoutedPath {
                points: waypoints.points().to_vec(),
                distance_km,
                duration_minutes: (distance_km * 12.0) as u32,
            })),
            Step::NoRoute => Ok(None),
            Step::Fail => Err(AppError::RoutingApi("HTTP 503: upstream down".to_string())),
        }
    }
}

/// Application state around stub services with an attached surface.
#[allow(dead_code)]
pub fn test_state(
    geocoder: Arc<StubGeocoder>,
    router: Arc<ScriptedRouter>,
    config: LoopGeneratorConfig,
) -> Arc<AppState> {
    let surface = Arc::new(GeoJsonSurface::attached(paris(), 13));
    test_state_with_surface(geocoder, router, surface, config)
}

#[allow(dead_code)]
pub fn test_state_with_surface(
    geocoder: Arc<StubGeocoder>,
    router: Arc<ScriptedRouter>,
    surface: Arc<GeoJsonSurface>,
    config: LoopGeneratorConfig,
) -> Arc<AppState> {
    Arc::new(AppState::with_services(
        geocoder, router, surface, None, config,
    ))
}
