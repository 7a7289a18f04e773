//! The API's CORS policy.
//!
//! Browser clients served from any `http://localhost` port may call `/api/**`
//! with credentials.

use crate::cors::{CorsPolicy, CorsRegistry};
use crate::error::CorsError;
use http::Method;
use std::time::Duration;

/// Path prefix the policy is registered for
pub const API_PATH_PATTERN: &str = "/api/**";

/// Origins allowed to call the API: localhost on any port
pub const LOCALHOST_ORIGIN_PATTERN: &str = "http://localhost:[*]";

/// Preflight cache lifetime
pub const MAX_AGE: Duration = Duration::from_secs(3600);

/// Build the CORS policy for the API
pub fn build_policy() -> Result<CorsPolicy, CorsError> {
    CorsPolicy::builder()
        .allowed_origin_patterns([LOCALHOST_ORIGIN_PATTERN])
        .allow_credentials(true)
        .allowed_headers(["*"])
        .allowed_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
            Method::OPTIONS,
        ])
        .exposed_headers(["*"])
        .max_age(MAX_AGE)
        .build()
}

/// Build the registration table consulted on every request
pub fn cors_registry() -> Result<CorsRegistry, CorsError> {
    let registry = CorsRegistry::builder()
        .register(API_PATH_PATTERN, build_policy()?)?
        .build();

    tracing::info!(
        pattern = API_PATH_PATTERN,
        origins = LOCALHOST_ORIGIN_PATTERN,
        "CORS policy registered"
    );

    Ok(registry)
}
