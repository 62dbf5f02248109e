use axum::Router;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::server::ProcureServer;

/// Main OpenAPI documentation structure
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health::health_check,
        crate::handlers::auth::register,
        crate::handlers::auth::login,
        crate::handlers::auth::me,
        crate::handlers::contact::submit_contact,
        crate::handlers::tenders::list_tenders,
        crate::handlers::tenders::get_tender,
        crate::handlers::tenders::create_tender,
        crate::handlers::tenders::award_tender,
        crate::handlers::bids::submit_bid,
        crate::handlers::bids::list_bids,
        crate::handlers::audit_logs::list_audit_logs,
        crate::handlers::admin::deactivate_user,
    ),
    components(
        schemas(
            crate::handlers::health::HealthResponse,
            crate::handlers::auth::RegisterRequest,
            crate::handlers::auth::LoginRequest,
            crate::handlers::auth::SessionResponse,
            crate::handlers::contact::ContactRequest,
            crate::handlers::contact::ContactResponse,
            crate::handlers::bids::SubmitBidRequest,
            crate::handlers::admin::AccountActionResponse,
            auth_identity::Role,
            auth_identity::UserPublic,
            database_layer::Tender,
            database_layer::TenderStatus,
            database_layer::CreateTender,
            database_layer::Bid,
            audit_engine::AuditEntry,
            audit_engine::AuditDetails,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "System health endpoints"),
        (name = "authentication", description = "Account registration and login"),
        (name = "contact", description = "Public contact form"),
        (name = "tenders", description = "Procurement tender management"),
        (name = "bids", description = "Supplier bids against tenders"),
        (name = "audit", description = "Request audit trail"),
        (name = "admin", description = "Administrative account operations"),
    ),
    info(
        title = "OpenProcure API",
        description = "Public procurement backend with bearer-token authentication, \
                       role-based authorization, and a full request audit trail.",
        contact(
            name = "OpenProcure Team",
            email = "api@openprocure.dev"
        ),
        license(
            name = "AGPL-3.0-only"
        ),
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server"),
        (url = "https://api.openprocure.dev", description = "Production server"),
    ),
)]
pub struct ApiDoc;

/// Registers the bearer scheme referenced by the `security` annotations.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Create OpenAPI documentation routes
pub fn create_docs_routes() -> Router<ProcureServer> {
    Router::new().merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
