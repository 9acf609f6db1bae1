use crate::surface::MapSurface;
use crate::AppState;
use axum::{extract::State, Json};
use serde_json::{json, Value};
use std::sync::Arc;

/// GET /debug/health - Check if services are working
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<Value> {
    let mut status = json!({
        "status": "ok",
        "checks": {}
    });

    if state.surface.is_ready() {
        status["checks"]["map_surface"] = json!("ok");
    } else {
        status["checks"]["map_surface"] = json!({"error": "not initialized"});
        status["status"] = json!("error");
    }

    status["checks"]["loops"] = json!({
        "count": state.registry.len(),
        "created": state.registry.created_count(),
    });

    match state.cache {
        Some(ref cache) => {
            let stats = cache.get_stats().await;
            status["checks"]["geocode_cache"] = json!({
                "backend": cache.backend_name(),
                "healthy": cache.health_check().await,
                "stats": stats,
            });
        }
        None => {
            status["checks"]["geocode_cache"] = json!("disabled");
        }
    }

    Json(status)
}
