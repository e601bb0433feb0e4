//! Health check handler

use axum::response::Json;

use crate::runtime::types::HealthResponse;

/// GET /health - Liveness probe with version info
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
