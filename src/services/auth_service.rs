//! Authentication service - registration and credential checks.
//!
//! The store and the hasher are injected as trait objects so either can be
//! replaced in tests.

use async_trait::async_trait;
use std::sync::Arc;

use super::CredentialService;
use crate::config::DUMMY_PASSWORD_HASH;
use crate::domain::{NewUser, User};
use crate::errors::{AppError, AppResult};
use crate::infra::UserRepository;

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Register a new user. Input is expected to be validated already.
    async fn register(&self, name: String, email: String, password: String) -> AppResult<User>;

    /// Check credentials and return the matching user
    async fn login(&self, email: String, password: String) -> AppResult<User>;
}

/// Concrete implementation of AuthService.
pub struct Authenticator {
    users: Arc<dyn UserRepository>,
    credentials: Arc<dyn CredentialService>,
}

impl Authenticator {
    pub fn new(users: Arc<dyn UserRepository>, credentials: Arc<dyn CredentialService>) -> Self {
        Self { users, credentials }
    }
}

#[async_trait]
impl AuthService for Authenticator {
    async fn register(&self, name: String, email: String, password: String) -> AppResult<User> {
        if self.users.find_by_email(&email).await?.is_some() {
            tracing::warn!("Registration rejected: email already exists");
            return Err(AppError::conflict("Email"));
        }

        let password_hash = self.credentials.hash(&password)?;

        // A concurrent registration may still win between the check and here;
        // the store reports that as a conflict too.
        let user = self
            .users
            .create(NewUser {
                name,
                email,
                password_hash,
            })
            .await?;

        tracing::info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    async fn login(&self, email: String, password: String) -> AppResult<User> {
        let user = self.users.find_by_email(&email).await?;

        // Verify even when the user is missing so both failures take the same time.
        let stored_hash = user
            .as_ref()
            .map_or(DUMMY_PASSWORD_HASH, |u| u.password_hash.as_str());
        let password_valid = self.credentials.verify(&password, stored_hash);

        match user {
            Some(user) if password_valid => {
                tracing::info!(user_id = %user.id, "User logged in");
                Ok(user)
            }
            _ => {
                tracing::warn!("Login rejected: invalid credentials");
                Err(AppError::InvalidCredentials)
            }
        }
    }
}
