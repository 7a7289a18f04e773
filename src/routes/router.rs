use crate::cors::CorsRegistry;
use axum::http::StatusCode;
use axum::middleware;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::get;
use serde_json::json;
use tower_http::trace::TraceLayer;

use super::health;

/// Create application router
///
/// The CORS registry is injected as middleware state; it is consulted for
/// every request, including ones that fall through to the fallback.
pub fn create_router(cors_registry: CorsRegistry) -> axum::Router {
    use crate::middleware::{cors_middleware, request_id_middleware};

    let api_routes = axum::Router::new().route("/api/ping", get(health::ping));

    let health_routes = axum::Router::new().route("/health", get(health::health_check));

    api_routes
        .merge(health_routes)
        .fallback(not_found)
        .layer(middleware::from_fn_with_state(cors_registry, cors_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
}

async fn not_found() -> Response {
    let body = json!({
        "error": "NOT_FOUND",
        "message": "No route for this path",
    });
    (StatusCode::NOT_FOUND, Json(body)).into_response()
}

