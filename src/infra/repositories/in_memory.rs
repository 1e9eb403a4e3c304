//! In-memory user store, used by `serve --in-memory` and the test suite.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::UserRepository;
use crate::domain::{NewUser, User};
use crate::errors::{AppError, AppResult};

/// Users keyed by email. The existence check and the insert happen under
/// one write lock.
#[derive(Default)]
pub struct InMemoryUserStore {
    users: RwLock<HashMap<String, User>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users
    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserStore {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self.users.read().await.get(email).cloned())
    }

    async fn create(&self, new_user: NewUser) -> AppResult<User> {
        let mut users = self.users.write().await;
        if users.contains_key(&new_user.email) {
            return Err(AppError::conflict("Email"));
        }

        let user = User::new(Uuid::new_v4(), new_user);
        users.insert(user.email.clone(), user.clone());
        Ok(user)
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}
