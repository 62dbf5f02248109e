//! Audit entry types and structures.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;

/// One record of a request that passed through the API.
///
/// Entries are built by the HTTP layer after the response has been produced,
/// so they always carry the final status code and the measured duration.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuditEntry {
    /// Unique identifier for this entry.
    pub id: Uuid,
    /// Method and path, for example `POST /api/v1/tenders`.
    pub action: String,
    /// Resource collection the request touched, `unknown` when the path
    /// carries no collection segment.
    pub resource: String,
    /// Identifier of the individual record when one appears in the path.
    pub record_id: Option<String>,
    /// Authenticated principal, `None` for anonymous requests.
    pub principal_id: Option<Uuid>,
    /// Client address as reported by proxy headers or the socket.
    pub ip_address: String,
    /// Raw `User-Agent` header, `unknown` when the client sent none.
    pub user_agent: String,
    /// When the entry was captured.
    pub timestamp: DateTime<Utc>,
    /// Request and response payload details.
    pub details: AuditDetails,
}

/// Structured payload attached to an [`AuditEntry`].
///
/// `query` and `body` are stored post-redaction, see [`crate::redact`].
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuditDetails {
    /// Query string parameters, `null` when the URL had none.
    pub query: Value,
    /// Path parameters extracted from the route, `null` when absent.
    pub params: Value,
    /// Captured request body, `null` when not captured.
    pub body: Value,
    /// HTTP status code of the response.
    pub status_code: u16,
    /// Wall-clock time spent handling the request.
    pub duration_ms: u64,
    /// Declared request body size, when the client sent one.
    pub content_length: Option<u64>,
}

impl Default for AuditDetails {
    fn default() -> Self {
        Self {
            query: Value::Null,
            params: Value::Null,
            body: Value::Null,
            status_code: 0,
            duration_ms: 0,
            content_length: None,
        }
    }
}

impl AuditEntry {
    /// Creates an entry for `action` against `resource` with capture defaults.
    pub fn new(action: impl Into<String>, resource: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            action: action.into(),
            resource: resource.into(),
            record_id: None,
            principal_id: None,
            ip_address: "unknown".to_owned(),
            user_agent: "unknown".to_owned(),
            timestamp: Utc::now(),
            details: AuditDetails::default(),
        }
    }
}
