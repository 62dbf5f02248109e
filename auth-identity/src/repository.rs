use crate::error::{IdentityError, Result};
use crate::models::User;
use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use uuid::Uuid;

/// Credential store boundary consumed by the identity service and the
/// server's authentication gate.
///
/// Lookups return `Ok(None)` for absent rows; error variants are reserved
/// for storage faults and constraint violations.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn create(&self, user: &User) -> Result<User>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn update_last_login(&self, id: Uuid) -> Result<()>;
    async fn set_active(&self, id: Uuid, is_active: bool) -> Result<()>;
}

/// In-memory store for tests and local development.
#[derive(Default)]
pub struct InMemoryUserStore {
    users: DashMap<Uuid, User>,
    emails: DashMap<String, Uuid>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn create(&self, user: &User) -> Result<User> {
        if self.emails.contains_key(&user.email) {
            return Err(IdentityError::EmailAlreadyInUse);
        }
        self.emails.insert(user.email.clone(), user.id);
        self.users.insert(user.id, user.clone());
        Ok(user.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        Ok(self.users.get(&id).map(|user| user.clone()))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let Some(id) = self.emails.get(email).map(|entry| *entry) else {
            return Ok(None);
        };
        self.find_by_id(id).await
    }

    async fn update_last_login(&self, id: Uuid) -> Result<()> {
        let mut user = self
            .users
            .get_mut(&id)
            .ok_or(IdentityError::UserNotFound)?;
        user.last_login_at = Some(Utc::now());
        user.updated_at = Utc::now();
        Ok(())
    }

    async fn set_active(&self, id: Uuid, is_active: bool) -> Result<()> {
        let mut user = self
            .users
            .get_mut(&id)
            .ok_or(IdentityError::UserNotFound)?;
        user.is_active = is_active;
        user.updated_at = Utc::now();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    fn sample_user(email: &str, role: Role) -> User {
        let now = Utc::now();
        User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            password_hash: "$argon2id$placeholder".to_string(),
            full_name: Some("Sample User".to_string()),
            role,
            organization_id: None,
            is_active: true,
            is_mfa_enabled: false,
            permissions: Vec::new(),
            created_at: now,
            updated_at: now,
            last_login_at: None,
        }
    }

    #[tokio::test]
    async fn create_then_find_by_id_and_email() {
        let store = InMemoryUserStore::new();
        let user = sample_user("buyer@gov.example", Role::ProcurementOfficer);

        let created = store.create(&user).await.expect("create should succeed");
        assert_eq!(created.id, user.id);

        let by_id = store.find_by_id(user.id).await.expect("find_by_id");
        assert_eq!(by_id.map(|u| u.email), Some(user.email.clone()));

        let by_email = store.find_by_email(&user.email).await.expect("find_by_email");
        assert_eq!(by_email.map(|u| u.id), Some(user.id));
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let store = InMemoryUserStore::new();
        let first = sample_user("dup@gov.example", Role::Supplier);
        let mut second = sample_user("dup@gov.example", Role::Citizen);
        second.id = Uuid::new_v4();

        store.create(&first).await.expect("first create");
        let err = store.create(&second).await.expect_err("second create must fail");
        assert!(matches!(err, IdentityError::EmailAlreadyInUse));
    }

    #[tokio::test]
    async fn missing_rows_come_back_as_none() {
        let store = InMemoryUserStore::new();

        let by_id = store.find_by_id(Uuid::new_v4()).await.expect("find_by_id");
        assert!(by_id.is_none());

        let by_email = store.find_by_email("nobody@gov.example").await.expect("find_by_email");
        assert!(by_email.is_none());
    }

    #[tokio::test]
    async fn set_active_flips_the_flag() {
        let store = InMemoryUserStore::new();
        let user = sample_user("active@gov.example", Role::Auditor);
        store.create(&user).await.expect("create");

        store.set_active(user.id, false).await.expect("set_active");
        let reloaded = store
            .find_by_id(user.id)
            .await
            .expect("find_by_id")
            .expect("user exists");
        assert!(!reloaded.is_active);
    }

    #[tokio::test]
    async fn update_last_login_stamps_the_row() {
        let store = InMemoryUserStore::new();
        let user = sample_user("login@gov.example", Role::Supplier);
        store.create(&user).await.expect("create");

        store.update_last_login(user.id).await.expect("update_last_login");
        let reloaded = store
            .find_by_id(user.id)
            .await
            .expect("find_by_id")
            .expect("user exists");
        assert!(reloaded.last_login_at.is_some());
    }

    #[tokio::test]
    async fn updates_against_missing_users_error() {
        let store = InMemoryUserStore::new();
        let err = store
            .set_active(Uuid::new_v4(), false)
            .await
            .expect_err("must fail");
        assert!(matches!(err, IdentityError::UserNotFound));
    }
}
