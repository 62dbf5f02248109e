//! OpenProcure Server - public procurement platform API
//!
//! This library provides the core functionality of the OpenProcure HTTP
//! server: bearer-token authentication, role-based authorization, and an
//! append-only audit trail around a small procurement API.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod server;
pub mod validation;

// Re-export commonly used types
pub use config::{runtime_env, set_runtime_env, Environment, ServerConfig};
pub use error::*;
pub use server::ProcureServer;

use axum::Router;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

/// Create the main application router with all routes and middleware
///
/// Layer order, outermost first: trace span, CORS, audit capture, then the
/// routes with their own gate and guard layers. The audit capture sits
/// outside the authentication gate so rejected requests are recorded too.
pub fn create_app(server: ProcureServer) -> Router {
    let trace = TraceLayer::new_for_http().make_span_with(|request: &axum::extract::Request| {
        tracing::info_span!(
            "request",
            method = %request.method(),
            path = %request.uri().path(),
            ip = %middleware::client_ip(request),
            principal_id = tracing::field::Empty,
        )
    });
    let cors = middleware::create_cors_layer(&server.config);

    routes::create_routes(&server)
        .layer(
            ServiceBuilder::new()
                .layer(trace)
                .layer(cors)
                .layer(axum::middleware::from_fn_with_state(
                    server.clone(),
                    middleware::capture_request_audit,
                )),
        )
        .with_state(server)
}
