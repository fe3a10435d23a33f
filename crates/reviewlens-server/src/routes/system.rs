//! Health and NLP capability routes.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health))
        .route("/capabilities", get(get_capabilities))
}

/// GET /api/health
async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// GET /api/capabilities: strategies selected at startup.
async fn get_capabilities(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let capabilities = state.engine.capabilities();
    Json(serde_json::json!({
        "capabilities": capabilities,
        "tier": capabilities.tier(),
        "keyword_count": state.engine.keyword_count(),
        "resources": state.resources_dir().display().to_string(),
    }))
}
