mod geojson_surface;

pub use geojson_surface::{GeoJsonSurface, MapSnapshot, PathLayer, Viewport};

use crate::models::{BoundingBox, GeoPoint};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Identifies a path layer drawn on a map surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PathHandle(pub u64);

impl fmt::Display for PathHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "path#{}", self.0)
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SurfaceError {
    #[error("map surface is not initialized")]
    Unavailable,

    #[error("unknown path layer {0}")]
    UnknownHandle(PathHandle),

    #[error("cannot draw an empty path")]
    EmptyPath,
}

/// Where loops are drawn. Observes loop paths; never owns loop records.
pub trait MapSurface: Send + Sync {
    fn is_ready(&self) -> bool;

    /// Draw `points` in order as a path of the given colour.
    fn draw_path(&self, points: &[GeoPoint], color: &str) -> Result<PathHandle, SurfaceError>;

    /// Move the viewport so the whole path is visible.
    fn fit_bounds(&self, handle: PathHandle) -> Result<BoundingBox, SurfaceError>;
}
