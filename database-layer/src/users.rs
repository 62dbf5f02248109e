//! Postgres-backed user store.

use async_trait::async_trait;
use auth_identity::{IdentityError, User, UserStore};
use uuid::Uuid;

use crate::connection::DatabasePool;
use crate::error::DatabaseError;

/// Folds classified storage faults into identity errors.
fn identity_error(error: sqlx::Error) -> IdentityError {
    match DatabaseError::from(error) {
        DatabaseError::Duplicate => IdentityError::EmailAlreadyInUse,
        DatabaseError::InvalidReference => IdentityError::InvalidReference,
        DatabaseError::NotFound => IdentityError::UserNotFound,
        other => IdentityError::Storage(other.to_string()),
    }
}

#[derive(Clone)]
pub struct PgUserStore {
    pool: DatabasePool,
}

impl PgUserStore {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn create(&self, user: &User) -> Result<User, IdentityError> {
        let created = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (
                id, email, password_hash, full_name, role, organization_id,
                is_active, is_mfa_enabled, permissions,
                created_at, updated_at, last_login_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING *
            "#,
        )
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.full_name)
        .bind(user.role.as_str())
        .bind(user.organization_id)
        .bind(user.is_active)
        .bind(user.is_mfa_enabled)
        .bind(&user.permissions)
        .bind(user.created_at)
        .bind(user.updated_at)
        .bind(user.last_login_at)
        .fetch_one(self.pool.pool())
        .await
        .map_err(identity_error)?;

        Ok(created)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, IdentityError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool.pool())
            .await
            .map_err(identity_error)?;

        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, IdentityError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(self.pool.pool())
            .await
            .map_err(identity_error)?;

        Ok(user)
    }

    async fn update_last_login(&self, id: Uuid) -> Result<(), IdentityError> {
        let result =
            sqlx::query("UPDATE users SET last_login_at = NOW(), updated_at = NOW() WHERE id = $1")
                .bind(id)
                .execute(self.pool.pool())
                .await
                .map_err(identity_error)?;

        if result.rows_affected() == 0 {
            return Err(IdentityError::UserNotFound);
        }
        Ok(())
    }

    async fn set_active(&self, id: Uuid, is_active: bool) -> Result<(), IdentityError> {
        let result =
            sqlx::query("UPDATE users SET is_active = $2, updated_at = NOW() WHERE id = $1")
                .bind(id)
                .bind(is_active)
                .execute(self.pool.pool())
                .await
                .map_err(identity_error)?;

        if result.rows_affected() == 0 {
            return Err(IdentityError::UserNotFound);
        }
        Ok(())
    }
}
