pub mod paths;

use axum::{
    extract::Request,
    middleware::{self, Next},
    routing::{get, post},
    Router,
};

use crate::handlers::{self, admin, audit_logs, auth, bids, contact, health, tenders};
use crate::middleware::{guards, limit_login_attempts, require_authentication};
use crate::openapi;
use crate::server::ProcureServer;

/// Create health check routes
pub fn health_routes() -> Router<ProcureServer> {
    Router::new().route(paths::HEALTH, get(health::health_check))
}

/// Create routes reachable without a token
pub fn public_routes(server: &ProcureServer) -> Router<ProcureServer> {
    Router::new()
        .route(paths::api_v1::AUTH_REGISTER, post(auth::register))
        .route(
            paths::api_v1::AUTH_LOGIN,
            post(auth::login).route_layer(middleware::from_fn_with_state(
                server.clone(),
                limit_login_attempts,
            )),
        )
        .route(paths::api_v1::CONTACT, post(contact::submit_contact))
}

/// Create routes behind the authentication gate
///
/// Role and permission guards are `route_layer`s inside the gate, so a
/// request is always authenticated before any authorization check runs.
pub fn protected_routes(server: &ProcureServer) -> Router<ProcureServer> {
    Router::new()
        .route(paths::api_v1::AUTH_ME, get(auth::me))
        .route(paths::api_v1::TENDERS, get(tenders::list_tenders))
        .route(paths::api_v1::TENDER_BY_ID, get(tenders::get_tender))
        .route(
            paths::api_v1::TENDERS,
            post(tenders::create_tender).route_layer(middleware::from_fn(
                |request: Request, next: Next| {
                    guards::enforce_roles(guards::TENDER_WRITERS, request, next)
                },
            )),
        )
        .route(
            paths::api_v1::TENDER_AWARD,
            post(tenders::award_tender).route_layer(middleware::from_fn(
                |request: Request, next: Next| {
                    guards::enforce_permission("tender:award", request, next)
                },
            )),
        )
        .route(
            paths::api_v1::TENDER_BIDS,
            post(bids::submit_bid)
                .route_layer(middleware::from_fn(guards::enforce_organization))
                .route_layer(middleware::from_fn(|request: Request, next: Next| {
                    guards::enforce_roles(guards::SUPPLIERS_ONLY, request, next)
                })),
        )
        .route(
            paths::api_v1::TENDER_BIDS,
            get(bids::list_bids).route_layer(middleware::from_fn(
                |request: Request, next: Next| {
                    guards::enforce_roles(guards::BID_REVIEWERS, request, next)
                },
            )),
        )
        .route(
            paths::api_v1::AUDIT_LOGS,
            get(audit_logs::list_audit_logs).route_layer(middleware::from_fn(
                |request: Request, next: Next| {
                    guards::enforce_roles(guards::AUDIT_READERS, request, next)
                },
            )),
        )
        .route(
            paths::api_v1::ADMIN_DEACTIVATE_USER,
            post(admin::deactivate_user)
                .route_layer(middleware::from_fn(guards::enforce_mfa))
                .route_layer(middleware::from_fn(|request: Request, next: Next| {
                    guards::enforce_roles(guards::SUPER_ADMIN_ONLY, request, next)
                })),
        )
        .route_layer(middleware::from_fn_with_state(
            server.clone(),
            require_authentication,
        ))
}

/// Create the versioned API surface
pub fn api_v1_routes(server: &ProcureServer) -> Router<ProcureServer> {
    public_routes(server).merge(protected_routes(server))
}

/// Create all application routes
pub fn create_routes(server: &ProcureServer) -> Router<ProcureServer> {
    Router::new()
        // Health check routes (no authentication required)
        .merge(health_routes())
        // API documentation routes
        .merge(openapi::create_docs_routes())
        // API v1 routes
        .nest(paths::API_V1, api_v1_routes(server))
        .fallback(handlers::not_found)
}
