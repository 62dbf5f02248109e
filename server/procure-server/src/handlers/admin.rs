use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::Principal;
use crate::error::{api_success, ApiError, ApiResponse};
use crate::server::ProcureServer;

/// Outcome of an administrative account action
#[derive(Debug, Serialize, ToSchema)]
pub struct AccountActionResponse {
    pub message: String,
}

/// Deactivate a user account
///
/// The gate re-reads the user store on every request, so the deactivated
/// account is locked out from its very next call even if it still holds a
/// structurally valid token.
#[utoipa::path(
    post,
    path = "/api/v1/admin/users/{id}/deactivate",
    tag = "admin",
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "Account deactivated", body = AccountActionResponse),
        (status = 403, description = "Caller is not a super admin with MFA enabled"),
        (status = 404, description = "No user with this ID")
    ),
    security(("bearer_auth" = []))
)]
pub async fn deactivate_user(
    State(server): State<ProcureServer>,
    principal: Principal,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<AccountActionResponse>>, ApiError> {
    server.users.set_active(id, false).await?;

    tracing::info!(user_id = %id, deactivated_by = %principal.id, "account deactivated");
    Ok(Json(api_success(AccountActionResponse {
        message: "User account has been deactivated".to_string(),
    })))
}
