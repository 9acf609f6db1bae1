use crate::error::{AppError, Result};
use crate::models::loop_route::{GenerateLoopsRequest, LoopListQuery, LoopListResponse};
use crate::models::{BatchReport, Loop};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    Json,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;

/// POST /loops
/// Generate a batch of loops around an address
pub async fn create_loops(
    State(state): State<Arc<AppState>>,
    Json(request): Json<GenerateLoopsRequest>,
) -> Result<Json<BatchReport>> {
    let count = request.batch_size(state.loop_config.batch_size);

    let mut rng = match request.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let report = state
        .orchestrator
        .generate_loops(&request.loop_request(), count, &mut rng)
        .await?;

    Ok(Json(report))
}

/// GET /loops?recent=N
/// Most recent loops, oldest first. `recent=0` lists every loop.
pub async fn list_loops(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LoopListQuery>,
) -> Json<LoopListResponse> {
    let limit = query.recent.unwrap_or(state.loop_config.recent_limit);
    let loops = if limit == 0 {
        state.registry.all()
    } else {
        state.registry.recent(limit)
    };

    Json(LoopListResponse {
        total: state.registry.len(),
        loops,
    })
}

/// GET /loops/{id}
pub async fn get_loop(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<Json<Loop>> {
    state
        .registry
        .get(id)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Loop {} not found", id)))
}
