use crate::routes::types::{HealthCheckResponse, PingResponse};
use axum::Json;

/// Health check endpoint, outside the CORS-covered prefix
pub async fn health_check() -> Json<HealthCheckResponse> {
    Json(HealthCheckResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Ping endpoint under `/api`
pub async fn ping() -> Json<PingResponse> {
    Json(PingResponse {
        status: "ok".to_string(),
    })
}
