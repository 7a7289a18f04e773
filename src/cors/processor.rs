//! Applies a [`CorsPolicy`] to a single request.
//!
//! The processor only inspects request metadata and produces a decision; the
//! middleware is responsible for turning that decision into a response.

use super::policy::CorsPolicy;
use http::header::{
    ACCESS_CONTROL_ALLOW_CREDENTIALS, ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
    ACCESS_CONTROL_ALLOW_ORIGIN, ACCESS_CONTROL_EXPOSE_HEADERS, ACCESS_CONTROL_MAX_AGE,
    ACCESS_CONTROL_REQUEST_HEADERS, ACCESS_CONTROL_REQUEST_METHOD, HOST, ORIGIN, VARY,
};
use http::{HeaderMap, HeaderValue, Method, Uri};

/// `Vary` entries added to every response covered by a policy
pub const VARY_HEADERS: [&str; 3] = [
    "Origin",
    "Access-Control-Request-Method",
    "Access-Control-Request-Headers",
];

/// Outcome of running a policy against a request
#[derive(Debug, Clone, PartialEq)]
pub enum CorsDecision {
    /// No `Origin`, or same-origin: forward untouched
    NotCors,
    /// Accepted preflight: answer directly with these headers
    Preflight(HeaderMap),
    /// Accepted cross-origin request: forward, then add these headers
    Actual(HeaderMap),
    /// Denied, with the reason
    Rejected(String),
}

pub fn is_preflight(method: &Method, headers: &HeaderMap) -> bool {
    method == Method::OPTIONS
        && headers.contains_key(ORIGIN)
        && headers.contains_key(ACCESS_CONTROL_REQUEST_METHOD)
}

/// Decide how `policy` applies to a request
pub fn process(policy: &CorsPolicy, method: &Method, uri: &Uri, headers: &HeaderMap) -> CorsDecision {
    let Some(origin_value) = headers.get(ORIGIN) else {
        return CorsDecision::NotCors;
    };
    let Ok(origin) = origin_value.to_str() else {
        return CorsDecision::Rejected("Origin header is not valid ASCII".to_string());
    };

    if is_same_origin(origin, uri, headers) {
        return CorsDecision::NotCors;
    }

    if !policy.check_origin(origin) {
        return CorsDecision::Rejected(format!("origin '{}' is not allowed", origin));
    }

    let preflight = is_preflight(method, headers);
    if !preflight && !policy.check_method(method) {
        return CorsDecision::Rejected(format!("method '{}' is not allowed", method));
    }

    let mut out = HeaderMap::new();
    out.insert(ACCESS_CONTROL_ALLOW_ORIGIN, origin_value.clone());
    if policy.allow_credentials() {
        out.insert(ACCESS_CONTROL_ALLOW_CREDENTIALS, HeaderValue::from_static("true"));
    }

    if !preflight {
        if !policy.exposed_headers().is_empty() {
            if let Ok(value) = HeaderValue::from_str(&policy.exposed_headers().to_header_string()) {
                out.insert(ACCESS_CONTROL_EXPOSE_HEADERS, value);
            }
        }
        return CorsDecision::Actual(out);
    }

    let requested_method = headers
        .get(ACCESS_CONTROL_REQUEST_METHOD)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| Method::from_bytes(v.trim().as_bytes()).ok());
    match requested_method {
        Some(m) if policy.check_method(&m) => {}
        Some(m) => return CorsDecision::Rejected(format!("method '{}' is not allowed", m)),
        None => return CorsDecision::Rejected("invalid Access-Control-Request-Method".to_string()),
    }

    let requested_headers: Vec<&str> = headers
        .get_all(ACCESS_CONTROL_REQUEST_HEADERS)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .map(str::trim)
        .filter(|h| !h.is_empty())
        .collect();
    let Some(allowed_headers) = policy.check_headers(&requested_headers) else {
        return CorsDecision::Rejected("requested headers are not allowed".to_string());
    };

    if let Ok(value) = HeaderValue::from_str(&policy.methods_header_string()) {
        out.insert(ACCESS_CONTROL_ALLOW_METHODS, value);
    }
    if !allowed_headers.is_empty() {
        if let Ok(value) = HeaderValue::from_str(&allowed_headers.join(", ")) {
            out.insert(ACCESS_CONTROL_ALLOW_HEADERS, value);
        }
    }
    out.insert(ACCESS_CONTROL_MAX_AGE, HeaderValue::from(policy.max_age().as_secs()));

    CorsDecision::Preflight(out)
}

/// Append the `Vary` entries the response does not already list
pub fn add_vary_headers(headers: &mut HeaderMap) {
    let existing: Vec<String> = headers
        .get_all(VARY)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .map(|v| v.trim().to_ascii_lowercase())
        .collect();
    if existing.iter().any(|v| v == "*") {
        return;
    }

    let missing: Vec<&str> = VARY_HEADERS
        .iter()
        .copied()
        .filter(|name| !existing.iter().any(|v| v.eq_ignore_ascii_case(name)))
        .collect();
    if missing.is_empty() {
        return;
    }

    if let Ok(value) = HeaderValue::from_str(&missing.join(", ")) {
        headers.append(VARY, value);
    }
}

/// Scheme, lowercased host, and port with the scheme default filled in
fn origin_parts(scheme: &str, authority: &str) -> Option<(String, String, u16)> {
    let scheme = scheme.to_ascii_lowercase();
    let default_port = match scheme.as_str() {
        "http" => 80,
        "https" => 443,
        _ => return None,
    };

    let (host, port) = match authority.rsplit_once(':') {
        // bracketed IPv6 literal without a port
        Some((_, tail)) if tail.ends_with(']') => (authority, default_port),
        Some((host, port)) => (host, port.parse().ok()?),
        None => (authority, default_port),
    };
    if host.is_empty() {
        return None;
    }

    Some((scheme, host.to_ascii_lowercase(), port))
}

fn is_same_origin(origin: &str, uri: &Uri, headers: &HeaderMap) -> bool {
    let host = uri
        .authority()
        .map(|a| a.as_str())
        .or_else(|| headers.get(HOST).and_then(|h| h.to_str().ok()));
    let Some(host) = host else {
        return false;
    };
    let scheme = uri.scheme_str().unwrap_or("http");

    let origin = origin.strip_suffix('/').unwrap_or(origin);
    let Some((origin_scheme, origin_authority)) = origin.split_once("://") else {
        return false;
    };

    match (
        origin_parts(origin_scheme, origin_authority),
        origin_parts(scheme, host),
    ) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn policy() -> CorsPolicy {
        CorsPolicy::builder()
            .allowed_origin_patterns(["http://localhost:[*]"])
            .allow_credentials(true)
            .allowed_headers(["*"])
            .allowed_methods([Method::GET, Method::POST, Method::DELETE])
            .exposed_headers(["*"])
            .max_age(Duration::from_secs(3600))
            .build()
            .unwrap()
    }

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.append(*name, HeaderValue::from_static(*value));
        }
        map
    }

    fn uri(s: &str) -> Uri {
        s.parse().unwrap()
    }

    #[test]
    fn test_no_origin_is_not_cors() {
        let decision = process(&policy(), &Method::GET, &uri("/api/users"), &HeaderMap::new());
        assert_eq!(decision, CorsDecision::NotCors);
    }

    #[test]
    fn test_same_origin_is_not_cors() {
        let h = headers(&[("origin", "http://api.local:8080"), ("host", "api.local:8080")]);
        let decision = process(&policy(), &Method::GET, &uri("/api/users"), &h);
        assert_eq!(decision, CorsDecision::NotCors);
    }

    #[test]
    fn test_preflight_accepted() {
        let h = headers(&[
            ("origin", "http://localhost:5173"),
            ("access-control-request-method", "DELETE"),
            ("access-control-request-headers", "Content-Type, X-Trace"),
        ]);
        let CorsDecision::Preflight(out) = process(&policy(), &Method::OPTIONS, &uri("/api/users"), &h) else {
            panic!("expected preflight");
        };

        assert_eq!(out[ACCESS_CONTROL_ALLOW_ORIGIN], "http://localhost:5173");
        assert_eq!(out[ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
        assert_eq!(out[ACCESS_CONTROL_ALLOW_METHODS], "GET, POST, DELETE");
        assert_eq!(out[ACCESS_CONTROL_ALLOW_HEADERS], "Content-Type, X-Trace");
        assert_eq!(out[ACCESS_CONTROL_MAX_AGE], "3600");
        assert!(!out.contains_key(ACCESS_CONTROL_EXPOSE_HEADERS));
    }

    #[test]
    fn test_preflight_disallowed_method() {
        let h = headers(&[
            ("origin", "http://localhost:5173"),
            ("access-control-request-method", "PATCH"),
        ]);
        let decision = process(&policy(), &Method::OPTIONS, &uri("/api/users"), &h);
        assert!(matches!(decision, CorsDecision::Rejected(_)));
    }

    #[test]
    fn test_disallowed_origin_rejected() {
        let h = headers(&[("origin", "https://example.com")]);
        let decision = process(&policy(), &Method::GET, &uri("/api/users"), &h);
        assert!(matches!(decision, CorsDecision::Rejected(reason) if reason.contains("example.com")));
    }

    #[test]
    fn test_actual_request_headers() {
        let h = headers(&[("origin", "http://localhost:3000")]);
        let CorsDecision::Actual(out) = process(&policy(), &Method::GET, &uri("/api/users"), &h) else {
            panic!("expected actual");
        };

        assert_eq!(out[ACCESS_CONTROL_ALLOW_ORIGIN], "http://localhost:3000");
        assert_eq!(out[ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
        assert_eq!(out[ACCESS_CONTROL_EXPOSE_HEADERS], "*");
        assert!(!out.contains_key(ACCESS_CONTROL_MAX_AGE));
    }

    #[test]
    fn test_options_without_request_method_is_actual() {
        let with_options = CorsPolicy::builder()
            .allowed_origin_patterns(["http://localhost:[*]"])
            .allowed_methods([Method::GET, Method::OPTIONS])
            .build()
            .unwrap();
        let h = headers(&[("origin", "http://localhost:3000")]);
        let decision = process(&with_options, &Method::OPTIONS, &uri("/api/users"), &h);
        assert!(matches!(decision, CorsDecision::Actual(_)));
    }

    #[test]
    fn test_actual_request_method_not_allowed() {
        let h = headers(&[("origin", "http://localhost:3000")]);
        for method in [Method::HEAD, Method::PATCH, Method::TRACE] {
            let decision = process(&policy(), &method, &uri("/api/users"), &h);
            assert!(
                matches!(&decision, CorsDecision::Rejected(reason) if reason.contains(method.as_str())),
                "{} should be rejected",
                method
            );
        }
    }

    #[test]
    fn test_same_origin_default_ports() {
        let h = headers(&[("origin", "http://localhost:80"), ("host", "localhost")]);
        let decision = process(&policy(), &Method::GET, &uri("/api/users"), &h);
        assert_eq!(decision, CorsDecision::NotCors);

        let h = headers(&[("origin", "http://LocalHost"), ("host", "localhost:80")]);
        let decision = process(&policy(), &Method::GET, &uri("/api/users"), &h);
        assert_eq!(decision, CorsDecision::NotCors);

        let h = headers(&[("origin", "https://api.local"), ("host", "api.local:443")]);
        let decision = process(&policy(), &Method::GET, &uri("https://api.local:443/api/users"), &h);
        assert_eq!(decision, CorsDecision::NotCors);
    }

    #[test]
    fn test_different_port_is_cross_origin() {
        let h = headers(&[("origin", "http://localhost:5173"), ("host", "localhost:8080")]);
        let decision = process(&policy(), &Method::GET, &uri("/api/users"), &h);
        assert!(matches!(decision, CorsDecision::Actual(_)));
    }

    #[test]
    fn test_vary_appended_once() {
        let mut h = HeaderMap::new();
        add_vary_headers(&mut h);
        add_vary_headers(&mut h);

        let values: Vec<_> = h.get_all(VARY).iter().collect();
        assert_eq!(values.len(), 1);
        assert_eq!(
            values[0],
            "Origin, Access-Control-Request-Method, Access-Control-Request-Headers"
        );
    }

    #[test]
    fn test_vary_skips_existing_entries() {
        let mut h = headers(&[("vary", "origin, Accept-Encoding")]);
        add_vary_headers(&mut h);

        let values: Vec<_> = h.get_all(VARY).iter().collect();
        assert_eq!(values.len(), 2);
        assert_eq!(values[0], "origin, Accept-Encoding");
        assert_eq!(
            values[1],
            "Access-Control-Request-Method, Access-Control-Request-Headers"
        );
    }

    #[test]
    fn test_preflight_with_restricted_headers() {
        let restricted = CorsPolicy::builder()
            .allowed_origin_patterns(["http://localhost:[*]"])
            .allowed_headers(["content-type"])
            .build()
            .unwrap();
        let h = headers(&[
            ("origin", "http://localhost:3000"),
            ("access-control-request-method", "GET"),
            ("access-control-request-headers", "authorization"),
        ]);
        let decision = process(&restricted, &Method::OPTIONS, &uri("/api/users"), &h);
        assert!(matches!(decision, CorsDecision::Rejected(_)));
    }
}
