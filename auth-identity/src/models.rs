use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Platform role attached to every account.
///
/// Serialized SCREAMING_SNAKE_CASE on the wire and stored as TEXT. Coarse
/// route gating keys off this enum; the `permissions` list on [`User`] is a
/// finer mechanism that nothing assigns to yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    SuperAdmin,
    Admin,
    ProcurementOfficer,
    Supplier,
    Auditor,
    Citizen,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::SuperAdmin => "SUPER_ADMIN",
            Role::Admin => "ADMIN",
            Role::ProcurementOfficer => "PROCUREMENT_OFFICER",
            Role::Supplier => "SUPPLIER",
            Role::Auditor => "AUDITOR",
            Role::Citizen => "CITIZEN",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a stored role string no longer matches the enum.
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct ParseRoleError(pub String);

impl std::str::FromStr for Role {
    type Err = ParseRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SUPER_ADMIN" => Ok(Role::SuperAdmin),
            "ADMIN" => Ok(Role::Admin),
            "PROCUREMENT_OFFICER" => Ok(Role::ProcurementOfficer),
            "SUPPLIER" => Ok(Role::Supplier),
            "AUDITOR" => Ok(Role::Auditor),
            "CITIZEN" => Ok(Role::Citizen),
            other => Err(ParseRoleError(other.to_string())),
        }
    }
}

impl TryFrom<String> for Role {
    type Error = ParseRoleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// A stored account. `password_hash` never serializes; client-facing
/// payloads go through [`UserPublic`].
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub full_name: Option<String>,
    #[sqlx(try_from = "String")]
    pub role: Role,
    pub organization_id: Option<Uuid>,
    pub is_active: bool,
    pub is_mfa_enabled: bool,
    pub permissions: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

/// Client-facing projection of [`User`].
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserPublic {
    pub id: Uuid,
    pub email: String,
    pub full_name: Option<String>,
    pub role: Role,
    pub organization_id: Option<Uuid>,
    pub is_mfa_enabled: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserPublic {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            full_name: user.full_name.clone(),
            role: user.role,
            organization_id: user.organization_id,
            is_mfa_enabled: user.is_mfa_enabled,
            created_at: user.created_at,
        }
    }
}

impl From<User> for UserPublic {
    fn from(user: User) -> Self {
        Self::from(&user)
    }
}

/// Input for account creation. `password` is plaintext here and hashed by
/// the service before anything reaches a store.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUser {
    pub email: String,
    pub password: String,
    pub full_name: Option<String>,
    pub role: Role,
    pub organization_id: Option<Uuid>,
}
