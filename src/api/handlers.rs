//! Shell endpoints: discovery root, liveness and the 404 fallback

use super::state::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::{json, Value};

/// Name reported by `/health`
pub const SERVICE_NAME: &str = "holly-and-morty-api";

/// GET / - lists the main entry points
pub async fn root() -> Json<Value> {
    Json(json!({
        "message": "Welcome to Holly and Morty API",
        "docs": "/docs",
        "health": "/health",
        "webhooks": {
            "holly_conversation": "/webhooks/holly-conversation"
        }
    }))
}

/// GET /health - liveness plus storage status
///
/// Always 200: degraded storage is reported, not treated as unhealthy.
pub async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": SERVICE_NAME,
        "storage": state.store.status(),
    }))
}

/// Fallback for unknown paths
pub async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(json!({ "detail": "Not Found" })))
}
