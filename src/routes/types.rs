use serde::Serialize;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthCheckResponse {
    pub status: String,
    pub version: String,
}

/// Response of the API ping endpoint
#[derive(Debug, Serialize)]
pub struct PingResponse {
    pub status: String,
}
