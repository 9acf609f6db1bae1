use crate::error::Result;
use crate::surface::{MapSnapshot, SurfaceError};
use crate::AppState;
use axum::{extract::State, Json};
use std::sync::Arc;

/// GET /map
/// Drawn loop layers as a GeoJSON FeatureCollection, with the current viewport
pub async fn map_layers(State(state): State<Arc<AppState>>) -> Result<Json<MapSnapshot>> {
    let snapshot = state.surface.snapshot().ok_or(SurfaceError::Unavailable)?;
    Ok(Json(snapshot))
}
