//! Liveness endpoint

use crate::AppState;
use axum::{extract::State, response::IntoResponse, Json};

pub async fn handle_health(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "app": state.app_name,
        "version": state.version,
        "timestamp": chrono::Utc::now().timestamp(),
        "quote_relay_configured": state.quote_service.is_configured(),
        "email_relay_configured": state.email_service.is_configured(),
    }))
}
