use super::{MapSurface, PathHandle, SurfaceError};
use crate::models::{BoundingBox, GeoPoint};
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value};
use serde::Serialize;
use serde_json::json;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// A path as it was handed to the surface.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathLayer {
    pub handle: PathHandle,
    pub color: String,
    pub points: Vec<GeoPoint>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Viewport {
    Centered { center: GeoPoint, zoom: u8 },
    Fitted { bounds: BoundingBox },
}

/// Serializable view of the surface for a web map client.
#[derive(Debug, Clone, Serialize)]
pub struct MapSnapshot {
    pub viewport: Viewport,
    pub layers: FeatureCollection,
}

struct SurfaceState {
    layers: Vec<PathLayer>,
    viewport: Viewport,
    next_handle: u64,
}

/// In-process map surface that keeps drawn layers and exports them as GeoJSON.
///
/// Starts detached; drawing fails with [`SurfaceError::Unavailable`] until
/// [`GeoJsonSurface::attach`] gives it an initial view.
#[derive(Default)]
pub struct GeoJsonSurface {
    state: RwLock<Option<SurfaceState>>,
}

impl GeoJsonSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Surface already attached at the given view.
    pub fn attached(center: GeoPoint, zoom: u8) -> Self {
        let surface = Self::new();
        surface.attach(center, zoom);
        surface
    }

    /// Initialize the surface. Re-attaching resets the view but keeps layers.
    pub fn attach(&self, center: GeoPoint, zoom: u8) {
        let mut state = self.write();
        let viewport = Viewport::Centered { center, zoom };
        match state.as_mut() {
            Some(existing) => existing.viewport = viewport,
            None => {
                *state = Some(SurfaceState {
                    layers: Vec::new(),
                    viewport,
                    next_handle: 0,
                })
            }
        }
        tracing::debug!(lat = center.lat, lng = center.lng, zoom, "Map surface attached");
    }

    pub fn layer(&self, handle: PathHandle) -> Option<PathLayer> {
        self.read()
            .as_ref()?
            .layers
            .iter()
            .find(|layer| layer.handle == handle)
            .cloned()
    }

    pub fn layer_count(&self) -> usize {
        self.read().as_ref().map_or(0, |state| state.layers.len())
    }

    pub fn viewport(&self) -> Option<Viewport> {
        self.read().as_ref().map(|state| state.viewport)
    }

    /// Current layers and viewport, or `None` while detached.
    pub fn snapshot(&self) -> Option<MapSnapshot> {
        let guard = self.read();
        let state = guard.as_ref()?;

        let features = state.layers.iter().map(layer_to_feature).collect();

        Some(MapSnapshot {
            viewport: state.viewport,
            layers: FeatureCollection {
                bbox: None,
                features,
                foreign_members: None,
            },
        })
    }

    fn read(&self) -> RwLockReadGuard<'_, Option<SurfaceState>> {
        self.state.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Option<SurfaceState>> {
        self.state
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl MapSurface for GeoJsonSurface {
    fn is_ready(&self) -> bool {
        self.read().is_some()
    }

    fn draw_path(&self, points: &[GeoPoint], color: &str) -> Result<PathHandle, SurfaceError> {
        if points.is_empty() {
            return Err(SurfaceError::EmptyPath);
        }

        let mut guard = self.write();
        let state = guard.as_mut().ok_or(SurfaceError::Unavailable)?;

        let handle = PathHandle(state.next_handle);
        state.next_handle += 1;
        state.layers.push(PathLayer {
            handle,
            color: color.to_string(),
            points: points.to_vec(),
        });

        tracing::debug!(%handle, color, points = points.len(), "Drew path layer");
        Ok(handle)
    }

    fn fit_bounds(&self, handle: PathHandle) -> Result<BoundingBox, SurfaceError> {
        let mut guard = self.write();
        let state = guard.as_mut().ok_or(SurfaceError::Unavailable)?;

        let layer = state
            .layers
            .iter()
            .find(|layer| layer.handle == handle)
            .ok_or(SurfaceError::UnknownHandle(handle))?;
        let bounds = BoundingBox::from_path(&layer.points).ok_or(SurfaceError::EmptyPath)?;

        state.viewport = Viewport::Fitted { bounds };
        Ok(bounds)
    }
}

fn layer_to_feature(layer: &PathLayer) -> Feature {
    // GeoJSON positions are [lng, lat]
    let line = layer
        .points
        .iter()
        .map(|point| point.to_lng_lat().to_vec())
        .collect();

    let mut properties = JsonObject::new();
    properties.insert("handle".to_string(), json!(layer.handle.0));
    properties.insert("color".to_string(), json!(layer.color));

    Feature {
        bbox: None,
        geometry: Some(Geometry::new(Value::LineString(line))),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}
