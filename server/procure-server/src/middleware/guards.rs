//! Authorization guards layered inside the authentication gate.
//!
//! Pure predicates over the attached [`Principal`]; all of them fail
//! closed, so a route misconfigured without the gate denies with 403
//! rather than letting traffic through.

use crate::auth::Principal;
use crate::error::ApiError;
use auth_identity::Role;
use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;

/// Roles allowed to create or modify tenders.
pub const TENDER_WRITERS: &[Role] = &[Role::ProcurementOfficer, Role::Admin, Role::SuperAdmin];

/// Roles allowed to read submitted bids.
pub const BID_REVIEWERS: &[Role] = &[
    Role::ProcurementOfficer,
    Role::Admin,
    Role::SuperAdmin,
    Role::Auditor,
];

/// Roles allowed to read the audit trail.
pub const AUDIT_READERS: &[Role] = &[Role::SuperAdmin, Role::Auditor];

pub const SUPPLIERS_ONLY: &[Role] = &[Role::Supplier];

pub const SUPER_ADMIN_ONLY: &[Role] = &[Role::SuperAdmin];

fn forbidden() -> ApiError {
    ApiError::authorization("You do not have permission to perform this action")
}

fn principal(request: &Request) -> Result<&Principal, ApiError> {
    request.extensions().get::<Principal>().ok_or_else(forbidden)
}

/// 403 unless the principal's role is one of `allowed`.
pub async fn enforce_roles(
    allowed: &'static [Role],
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if !principal(&request)?.has_any_role(allowed) {
        return Err(forbidden());
    }
    Ok(next.run(request).await)
}

/// 403 unless `permission` is held. Nothing assigns permissions today, so
/// routes behind this deny every account until an assignment path exists.
pub async fn enforce_permission(
    permission: &'static str,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if !principal(&request)?.has_permission(permission) {
        return Err(forbidden());
    }
    Ok(next.run(request).await)
}

/// 403 unless the principal belongs to an organization.
pub async fn enforce_organization(request: Request, next: Next) -> Result<Response, ApiError> {
    if !principal(&request)?.belongs_to_organization() {
        return Err(ApiError::authorization(
            "You must belong to an organization to perform this action",
        ));
    }
    Ok(next.run(request).await)
}

/// 403 unless the principal has multi-factor authentication enabled.
pub async fn enforce_mfa(request: Request, next: Next) -> Result<Response, ApiError> {
    if !principal(&request)?.is_mfa_enabled {
        return Err(ApiError::authorization(
            "Multi-factor authentication is required for this action",
        ));
    }
    Ok(next.run(request).await)
}
