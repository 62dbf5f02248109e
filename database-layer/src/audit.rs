//! Postgres-backed audit store.

use async_trait::async_trait;
use audit_engine::{AuditDetails, AuditEntry, AuditError, AuditStore};
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use uuid::Uuid;

use crate::connection::DatabasePool;

fn storage_error(error: sqlx::Error) -> AuditError {
    AuditError::Storage(error.to_string())
}

/// Row shape for `audit_logs`, the JSONB payload decodes into
/// [`AuditDetails`].
#[derive(sqlx::FromRow)]
struct AuditRow {
    id: Uuid,
    action: String,
    resource: String,
    record_id: Option<String>,
    principal_id: Option<Uuid>,
    ip_address: String,
    user_agent: String,
    timestamp: DateTime<Utc>,
    details: Json<AuditDetails>,
}

impl From<AuditRow> for AuditEntry {
    fn from(row: AuditRow) -> Self {
        Self {
            id: row.id,
            action: row.action,
            resource: row.resource,
            record_id: row.record_id,
            principal_id: row.principal_id,
            ip_address: row.ip_address,
            user_agent: row.user_agent,
            timestamp: row.timestamp,
            details: row.details.0,
        }
    }
}

#[derive(Clone)]
pub struct PgAuditStore {
    pool: DatabasePool,
}

impl PgAuditStore {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuditStore for PgAuditStore {
    async fn append(&self, entry: &AuditEntry) -> audit_engine::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO audit_logs (
                id, action, resource, record_id, principal_id,
                ip_address, user_agent, timestamp, details
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(entry.id)
        .bind(&entry.action)
        .bind(&entry.resource)
        .bind(&entry.record_id)
        .bind(entry.principal_id)
        .bind(&entry.ip_address)
        .bind(&entry.user_agent)
        .bind(entry.timestamp)
        .bind(Json(&entry.details))
        .execute(self.pool.pool())
        .await
        .map_err(storage_error)?;

        Ok(())
    }

    async fn list_recent(&self, limit: i64) -> audit_engine::Result<Vec<AuditEntry>> {
        let rows = sqlx::query_as::<_, AuditRow>(
            r#"
            SELECT id, action, resource, record_id, principal_id,
                   ip_address, user_agent, timestamp, details
            FROM audit_logs
            ORDER BY timestamp DESC
            LIMIT $1
            "#,
        )
        .bind(limit.max(0))
        .fetch_all(self.pool.pool())
        .await
        .map_err(storage_error)?;

        Ok(rows.into_iter().map(AuditEntry::from).collect())
    }
}
