use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

use audit_engine::AuditEntry;

use crate::error::{api_success, ApiError, ApiResponse};
use crate::server::ProcureServer;

const DEFAULT_LIMIT: i64 = 50;
const MAX_LIMIT: i64 = 200;

#[derive(Debug, Deserialize, IntoParams)]
pub struct AuditLogQuery {
    /// Maximum number of entries to return, clamped to 1..=200
    pub limit: Option<i64>,
}

/// Read the audit trail
#[utoipa::path(
    get,
    path = "/api/v1/audit-logs",
    tag = "audit",
    params(AuditLogQuery),
    responses(
        (status = 200, description = "Recent entries, newest first", body = Vec<AuditEntry>),
        (status = 403, description = "Role not allowed to read the audit trail")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_audit_logs(
    State(server): State<ProcureServer>,
    Query(query): Query<AuditLogQuery>,
) -> Result<Json<ApiResponse<Vec<AuditEntry>>>, ApiError> {
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let entries = server.audit_store.list_recent(limit).await?;
    Ok(Json(api_success(entries)))
}
