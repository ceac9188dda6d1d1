use axum::{extract::State, response::Json};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::utils::logging::*;
use crate::AppState;

pub async fn health_check() -> Json<Value> {
    log_health_check();

    Json(json!({
        "status": "healthy",
        "service": "tiktok-oauth-server",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

pub async fn status_check(State(state): State<Arc<AppState>>) -> Json<Value> {
    log_status_check();

    let client_key_configured = !state.oauth.client_key.is_empty();

    Json(json!({
        "service": "tiktok-oauth-server",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "environment": std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string()),
        "oauth": {
            "client_key_configured": client_key_configured,
            "redirect_uri": state.oauth.redirect_uri,
            "authorize_url": state.oauth.authorize_url,
            "pending_challenges": state.challenges.pending_count().await
        }
    }))
}
