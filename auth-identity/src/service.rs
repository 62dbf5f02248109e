use crate::error::{IdentityError, Result};
use crate::models::{CreateUser, User};
use crate::repository::UserStore;
use argon2::password_hash::{rand_core::OsRng, SaltString};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

const MIN_PASSWORD_LENGTH: usize = 8;

/// Account lifecycle and credential verification on top of a [`UserStore`].
pub struct IdentityService {
    users: Arc<dyn UserStore>,
    argon2: Argon2<'static>,
}

impl IdentityService {
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self {
            users,
            argon2: Argon2::default(),
        }
    }

    /// Register a new account with a freshly hashed password.
    pub async fn register(&self, request: CreateUser) -> Result<User> {
        if !is_valid_email(&request.email) {
            return Err(IdentityError::InvalidEmail);
        }
        validate_password(&request.password)?;

        if self.users.find_by_email(&request.email).await?.is_some() {
            return Err(IdentityError::EmailAlreadyInUse);
        }

        let password_hash = self.hash_password(&request.password)?;
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email: request.email,
            password_hash,
            full_name: request.full_name,
            role: request.role,
            organization_id: request.organization_id,
            is_active: true,
            is_mfa_enabled: false,
            permissions: Vec::new(),
            created_at: now,
            updated_at: now,
            last_login_at: None,
        };

        let created = self.users.create(&user).await?;
        tracing::debug!(user_id = %created.id, role = %created.role, "user registered");
        Ok(created)
    }

    /// Verify credentials and return the account on success.
    ///
    /// Lookup misses and bad passwords both collapse into
    /// `InvalidCredentials`; only deactivation is reported distinctly.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<User> {
        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or(IdentityError::InvalidCredentials)?;

        if !user.is_active {
            return Err(IdentityError::AccountDisabled);
        }

        self.verify_password(password, &user.password_hash)?;

        self.users.update_last_login(user.id).await?;

        Ok(user)
    }

    pub fn hash_password(&self, password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let password_hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|_| IdentityError::HashingError)?
            .to_string();
        Ok(password_hash)
    }

    fn verify_password(&self, password: &str, hash: &str) -> Result<()> {
        let parsed_hash = PasswordHash::new(hash).map_err(|_| IdentityError::HashingError)?;

        self.argon2
            .verify_password(password.as_bytes(), &parsed_hash)
            .map_err(|_| IdentityError::InvalidCredentials)
    }
}

fn validate_password(password: &str) -> Result<()> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(IdentityError::WeakPassword);
    }
    Ok(())
}

fn is_valid_email(email: &str) -> bool {
    email.contains('@') && email.contains('.')
}
