// handlers/public/mod.rs - endpoints that never need an account
use axum::{extract::State, response::IntoResponse};
use serde_json::json;

use super::AppState;
use crate::middleware::ApiResponse;

/// GET / - service identity and route overview
pub async fn root(State(state): State<AppState>) -> impl IntoResponse {
    ApiResponse::success(json!({
        "name": "care-gateway",
        "version": env!("CARGO_PKG_VERSION"),
        "environment": state.config.environment,
        "endpoints": {
            "home": "/ (public)",
            "health": "/health (public)",
            "accounts": "/api/accounts/:id (self only)",
            "threads": "/api/threads/:id[/messages|/scheduled_messages]",
            "visits": "/api/visits/:id/submit (patients)",
        }
    }))
}

/// GET /health - liveness. Downstream services are not probed.
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    ApiResponse::success(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now(),
        "dispatch_mode": state.dispatcher.mode(),
    }))
}
