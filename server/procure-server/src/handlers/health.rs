use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::server::ProcureServer;

/// Health check response
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Always `success` while the process is serving
    #[schema(example = "success")]
    pub status: String,
    /// Current timestamp in RFC3339 format
    #[schema(example = "2026-08-25T10:30:00Z")]
    pub timestamp: String,
    /// API version
    #[schema(example = "0.1.0")]
    pub version: String,
    /// Active runtime environment
    #[schema(example = "development")]
    pub environment: String,
}

/// Liveness probe. Unauthenticated and exempt from auditing.
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    )
)]
pub async fn health_check(State(server): State<ProcureServer>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "success".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        environment: server.config.environment.as_str().to_string(),
    })
}
