//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{Json, extract::State};

use crate::ui::state::AppState;

/// Health check endpoint
///
/// Also reports how many sessions are currently logged in.
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let sessions = state.count_sessions().await;
    Json(serde_json::json!({"status": "ok", "sessions": sessions}))
}
