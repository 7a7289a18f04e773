use crate::cors::{self, processor::add_vary_headers, CorsDecision, CorsRegistry};
use crate::error::AppError;
use axum::{
    extract::{Request, State},
    http::{header::ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use uuid::Uuid;

/// Request ID wrapper for use in request extensions
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

impl RequestId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<String> for RequestId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Request ID middleware - adds a unique ID to each request
pub async fn request_id_middleware(mut req: Request, next: Next) -> Response {
    // Reuse the caller's ID if one was sent
    let request_id: RequestId = req
        .headers()
        .get("x-request-id")
        .and_then(|h| h.to_str().ok())
        .map(|s| RequestId::from(s.to_string()))
        .unwrap_or_default();

    req.extensions_mut().insert(request_id.clone());

    tracing::info!(
        request_id = %request_id.as_str(),
        method = %req.method(),
        path = %req.uri().path(),
        "Incoming request"
    );

    let mut response = next.run(req).await;

    if let Ok(header_value) = HeaderValue::from_str(request_id.as_str()) {
        response.headers_mut().insert("x-request-id", header_value);
    }

    response
}

/// CORS middleware - applies the registered policy for the request path.
///
/// Paths without a registered policy pass through untouched. Accepted
/// preflights are answered here without reaching the handler.
pub async fn cors_middleware(
    State(registry): State<CorsRegistry>,
    req: Request,
    next: Next,
) -> Response {
    let Some(policy) = registry.policy_for(req.uri().path()) else {
        return next.run(req).await;
    };

    let decision = cors::process(policy, req.method(), req.uri(), req.headers());

    let mut response = match decision {
        CorsDecision::NotCors => next.run(req).await,
        CorsDecision::Rejected(reason) => {
            let request_id = req
                .extensions()
                .get::<RequestId>()
                .map(|id| id.as_str())
                .unwrap_or("-");
            tracing::debug!(
                request_id = %request_id,
                method = %req.method(),
                path = %req.uri().path(),
                reason = %reason,
                "Rejected CORS request"
            );
            AppError::CorsRejected(reason).into_response()
        }
        CorsDecision::Preflight(headers) => {
            let mut response = StatusCode::OK.into_response();
            response.headers_mut().extend(headers);
            response
        }
        CorsDecision::Actual(headers) => {
            let mut response = next.run(req).await;
            // handler-supplied CORS headers take precedence
            if !response.headers().contains_key(ACCESS_CONTROL_ALLOW_ORIGIN) {
                response.headers_mut().extend(headers);
            }
            response
        }
    };

    add_vary_headers(response.headers_mut());
    response
}
