pub mod debug;
pub mod geocode;
pub mod loops;
pub mod map;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/loops", post(loops::create_loops).get(loops::list_loops))
        .route("/loops/{id}", get(loops::get_loop))
        .route("/geocode/search", get(geocode::search))
        .route("/geocode/reverse", get(geocode::reverse))
        .route("/map", get(map::map_layers))
        .route("/debug/health", get(debug::health_check))
        .with_state(state)
}
