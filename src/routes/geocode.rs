use crate::error::{AppError, Result};
use crate::models::GeoPoint;
use crate::AppState;
use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub address: String,
}

#[derive(Debug, Deserialize)]
pub struct ReverseQuery {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AddressResponse {
    pub address: String,
    pub point: GeoPoint,
}

/// GET /geocode/search?address=...
pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<AddressResponse>> {
    if query.address.trim().is_empty() {
        return Err(AppError::InvalidRequest(
            "address must not be empty".to_string(),
        ));
    }

    let point = state
        .geocoder
        .geocode(&query.address)
        .await?
        .ok_or_else(|| AppError::AddressNotFound(query.address.clone()))?;

    Ok(Json(AddressResponse {
        address: query.address,
        point,
    }))
}

/// GET /geocode/reverse?lat=..&lng=..
/// Display string for a map click, used to prefill the address field
pub async fn reverse(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ReverseQuery>,
) -> Result<Json<AddressResponse>> {
    let point = GeoPoint::new(query.lat, query.lng).map_err(AppError::InvalidRequest)?;
    let address = state.geocoder.reverse_geocode(point).await?;

    Ok(Json(AddressResponse { address, point }))
}
