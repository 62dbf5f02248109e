//! The request pipeline: authentication gate, authorization guards, audit
//! capture, and rate limiting.

pub mod audit;
pub mod auth_gate;
pub mod guards;
pub mod rate_limit;

// Re-export for convenience
pub use audit::capture_request_audit;
pub use auth_gate::require_authentication;
pub use rate_limit::{limit_login_attempts, RateLimitConfig, RateLimiter};

use axum::extract::connect_info::ConnectInfo;
use axum::extract::Request;
use axum::http::{header, HeaderMap, HeaderValue, Method};
use std::net::SocketAddr;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use uuid::Uuid;

use crate::config::ServerConfig;

/// Create CORS layer from the configured origin allow-list
pub fn create_cors_layer(config: &ServerConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
        .max_age(Duration::from_secs(3600));

    if config.cors_allows_any_origin() {
        layer.allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> = config
            .cors_allowed_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();
        layer.allow_origin(origins)
    }
}

/// Principal id stamped into response extensions by the gate so the
/// audit middleware, which sits outside it, can attribute the entry.
#[derive(Debug, Clone, Copy)]
pub struct AuditPrincipal(pub Uuid);

/// Best-effort client address: `X-Forwarded-For` first hop, then
/// `X-Real-IP`, then the socket address, then `"unknown"`.
pub(crate) fn client_ip(request: &Request) -> String {
    if let Some(ip) = first_forwarded_hop(request.headers()) {
        return ip;
    }
    if let Some(ip) = header_value(request.headers(), "x-real-ip") {
        return ip;
    }
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

fn first_forwarded_hop(headers: &HeaderMap) -> Option<String> {
    let forwarded = headers.get("x-forwarded-for")?.to_str().ok()?;
    let first = forwarded.split(',').next()?.trim();
    (!first.is_empty()).then(|| first.to_string())
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    let value = headers.get(name)?.to_str().ok()?.trim();
    (!value.is_empty()).then(|| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    #[test]
    fn forwarded_header_takes_precedence() {
        let request = Request::builder()
            .uri("/api/v1/tenders")
            .header("x-forwarded-for", "203.0.113.9, 10.0.0.1")
            .header("x-real-ip", "198.51.100.2")
            .body(Body::empty())
            .unwrap();
        assert_eq!(client_ip(&request), "203.0.113.9");
    }

    #[test]
    fn real_ip_is_the_second_choice() {
        let request = Request::builder()
            .uri("/api/v1/tenders")
            .header("x-real-ip", "198.51.100.2")
            .body(Body::empty())
            .unwrap();
        assert_eq!(client_ip(&request), "198.51.100.2");
    }

    #[test]
    fn unknown_when_nothing_identifies_the_peer() {
        let request = Request::builder()
            .uri("/api/v1/tenders")
            .body(Body::empty())
            .unwrap();
        assert_eq!(client_ip(&request), "unknown");
    }
}
