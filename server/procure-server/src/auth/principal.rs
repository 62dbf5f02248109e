//! The resolved identity attached to a request by the authentication gate.

use crate::error::ApiError;
use auth_identity::{Role, User};
use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use uuid::Uuid;

/// Request-scoped identity built from a verified token plus a fresh user
/// store read. Never cached across requests.
#[derive(Debug, Clone)]
pub struct Principal {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
    pub organization_id: Option<Uuid>,
    pub is_active: bool,
    pub is_mfa_enabled: bool,
    pub permissions: Vec<String>,
}

impl Principal {
    pub fn has_role(&self, role: Role) -> bool {
        self.role == role
    }

    pub fn has_any_role(&self, allowed: &[Role]) -> bool {
        allowed.contains(&self.role)
    }

    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.iter().any(|held| held == permission)
    }

    pub fn is_super_admin(&self) -> bool {
        self.has_role(Role::SuperAdmin)
    }

    pub fn belongs_to_organization(&self) -> bool {
        self.organization_id.is_some()
    }
}

impl From<&User> for Principal {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            role: user.role,
            organization_id: user.organization_id,
            is_active: user.is_active,
            is_mfa_enabled: user.is_mfa_enabled,
            permissions: user.permissions.clone(),
        }
    }
}

/// Extractor for handlers behind the gate. Fails closed: a route that was
/// never authenticated yields 403, not a panic or a silent pass.
#[async_trait]
impl<S> FromRequestParts<S> for Principal
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<Principal>().cloned().ok_or_else(|| {
            ApiError::authorization("You do not have permission to perform this action")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample_user(role: Role) -> User {
        let now = Utc::now();
        User {
            id: Uuid::new_v4(),
            email: "officer@gov.example".to_string(),
            password_hash: "argon2-hash".to_string(),
            full_name: Some("Test Officer".to_string()),
            role,
            organization_id: None,
            is_active: true,
            is_mfa_enabled: false,
            permissions: vec!["tender:read".to_string()],
            created_at: now,
            updated_at: now,
            last_login_at: None,
        }
    }

    #[test]
    fn principal_mirrors_the_user_row() {
        let user = sample_user(Role::ProcurementOfficer);
        let principal = Principal::from(&user);
        assert_eq!(principal.id, user.id);
        assert_eq!(principal.role, Role::ProcurementOfficer);
        assert!(principal.has_permission("tender:read"));
        assert!(!principal.has_permission("tender:award"));
    }

    #[test]
    fn role_predicates() {
        let principal = Principal::from(&sample_user(Role::Supplier));
        assert!(principal.has_role(Role::Supplier));
        assert!(principal.has_any_role(&[Role::Supplier, Role::Admin]));
        assert!(!principal.has_any_role(&[Role::SuperAdmin, Role::Auditor]));
        assert!(!principal.is_super_admin());
        assert!(!principal.belongs_to_organization());
    }
}
