use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use thiserror::Error;

/// Errors raised while building or registering a CORS policy
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CorsError {
    #[error("Invalid origin pattern '{pattern}': {reason}")]
    InvalidOriginPattern { pattern: String, reason: String },

    #[error("Invalid path pattern '{pattern}': {reason}")]
    InvalidPathPattern { pattern: String, reason: String },

    #[error("Invalid header name: {0}")]
    InvalidHeaderName(String),

    #[error("allow_credentials cannot be true when allowed origin patterns contain \"*\"")]
    CredentialsWithWildcardOrigin,
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("CORS configuration error: {0}")]
    Cors(#[from] CorsError),

    #[error("Invalid CORS request: {0}")]
    CorsRejected(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Convert AppError to HTTP response
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message, error_code) = match &self {
            AppError::CorsRejected(_) => (StatusCode::FORBIDDEN, self.to_string(), "CORS_REJECTED"),
            _ => {
                tracing::error!("Internal error: {}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                    "INTERNAL_ERROR",
                )
            }
        };

        let body = json!({
            "error": error_code,
            "message": error_message,
        });

        (status, Json(body)).into_response()
    }
}

/// Result type alias for AppResult
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cors_rejected_is_forbidden() {
        let response = AppError::CorsRejected("origin not allowed".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_configuration_error_is_internal() {
        let response = AppError::Configuration("bad".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_cors_error_converts() {
        let err: AppError = CorsError::CredentialsWithWildcardOrigin.into();
        assert!(err.to_string().starts_with("CORS configuration error"));
    }
}
