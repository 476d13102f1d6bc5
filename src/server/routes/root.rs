use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};

use crate::core::AppState;

/// GET /: unauthenticated liveness message
pub async fn root() -> Json<Value> {
    Json(json!({ "message": "Welcome to the Sukhi Multi-Agent Admin Backend API!" }))
}

/// GET /health: database reachability
pub async fn health(State(state): State<Arc<AppState>>) -> (StatusCode, Json<Value>) {
    if state.db.health_check().await {
        (StatusCode::OK, Json(json!({ "status": "ok" })))
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "unavailable" })),
        )
    }
}
