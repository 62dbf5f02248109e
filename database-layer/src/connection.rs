//! Database connection management and schema bootstrap.

use std::sync::Arc;
use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::{info, warn};

use crate::error::{DatabaseError, DatabaseResult};

/// Connection pool wrapper shared by every Postgres-backed store.
#[derive(Clone)]
pub struct DatabasePool {
    pool: Arc<PgPool>,
}

impl DatabasePool {
    /// Creates a pool against `connection_string`.
    pub async fn connect(connection_string: &str) -> DatabaseResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(50)
            .min_connections(5)
            .acquire_timeout(Duration::from_secs(30))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .connect(connection_string)
            .await
            .map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))?;

        info!("database connection pool created");

        Ok(Self {
            pool: Arc::new(pool),
        })
    }

    /// Get the underlying PgPool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Check if the pool is healthy.
    pub async fn is_healthy(&self) -> bool {
        match sqlx::query("SELECT 1").fetch_one(self.pool.as_ref()).await {
            Ok(_) => true,
            Err(e) => {
                warn!("database health check failed: {}", e);
                false
            }
        }
    }

    /// Creates the tables and indexes this service needs.
    ///
    /// Every statement is idempotent, so running this on every startup is
    /// safe and replaces a separate migration step.
    pub async fn initialize_schema(&self) -> DatabaseResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id UUID PRIMARY KEY,
                email TEXT NOT NULL UNIQUE,
                password_hash TEXT NOT NULL,
                full_name TEXT,
                role TEXT NOT NULL,
                organization_id UUID,
                is_active BOOLEAN NOT NULL DEFAULT TRUE,
                is_mfa_enabled BOOLEAN NOT NULL DEFAULT FALSE,
                permissions TEXT[] NOT NULL DEFAULT '{}',
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                last_login_at TIMESTAMPTZ
            )
            "#,
        )
        .execute(self.pool.as_ref())
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS tenders (
                id UUID PRIMARY KEY,
                title TEXT NOT NULL,
                description TEXT NOT NULL,
                category TEXT NOT NULL,
                budget BIGINT NOT NULL,
                deadline TIMESTAMPTZ NOT NULL,
                status TEXT NOT NULL DEFAULT 'open',
                created_by UUID NOT NULL REFERENCES users(id),
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
        )
        .execute(self.pool.as_ref())
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS bids (
                id UUID PRIMARY KEY,
                tender_id UUID NOT NULL REFERENCES tenders(id),
                supplier_id UUID NOT NULL REFERENCES users(id),
                organization_id UUID NOT NULL,
                amount BIGINT NOT NULL,
                notes TEXT,
                submitted_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
        )
        .execute(self.pool.as_ref())
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS audit_logs (
                id UUID PRIMARY KEY,
                action TEXT NOT NULL,
                resource TEXT NOT NULL,
                record_id TEXT,
                principal_id UUID,
                ip_address TEXT NOT NULL,
                user_agent TEXT NOT NULL,
                timestamp TIMESTAMPTZ NOT NULL,
                details JSONB NOT NULL
            )
            "#,
        )
        .execute(self.pool.as_ref())
        .await?;

        for statement in [
            "CREATE INDEX IF NOT EXISTS idx_users_email ON users(email)",
            "CREATE INDEX IF NOT EXISTS idx_tenders_status ON tenders(status)",
            "CREATE INDEX IF NOT EXISTS idx_bids_tender ON bids(tender_id)",
            "CREATE INDEX IF NOT EXISTS idx_audit_logs_timestamp ON audit_logs(timestamp DESC)",
            "CREATE INDEX IF NOT EXISTS idx_audit_logs_principal ON audit_logs(principal_id)",
        ] {
            sqlx::query(statement).execute(self.pool.as_ref()).await?;
        }

        info!("database schema initialized");
        Ok(())
    }

    /// Close the pool.
    pub async fn close(&self) {
        self.pool.close().await;
        info!("database connection pool closed");
    }
}
