//! Health check handler.

use axum::extract::State;
use axum::Json;

use crate::dto::response::{ApiResponse, HealthResponse};
use crate::state::AppState;

/// GET /api/health
pub async fn health(State(state): State<AppState>) -> Json<ApiResponse<HealthResponse>> {
    let database = match state.db.health_check().await {
        Ok(true) => "connected",
        _ => "unreachable",
    };

    Json(ApiResponse::ok(HealthResponse {
        status: if database == "connected" { "ok" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: database.to_string(),
    }))
}
