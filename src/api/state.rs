//! Application state - Dependency injection container.

use std::sync::Arc;

use crate::infra::{Database, InMemoryUserStore, UserRepository, UserStore};
use crate::services::{Argon2Credentials, AuthService, Authenticator, CredentialService};

/// Application state shared by all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Authentication service
    pub auth_service: Arc<dyn AuthService>,
    /// User store, also pinged by the health check
    pub users: Arc<dyn UserRepository>,
}

impl AppState {
    /// Wire the auth service over the given store and hasher.
    pub fn new(users: Arc<dyn UserRepository>, credentials: Arc<dyn CredentialService>) -> Self {
        let auth_service = Arc::new(Authenticator::new(users.clone(), credentials));
        Self {
            auth_service,
            users,
        }
    }

    /// PostgreSQL-backed state with Argon2 hashing.
    pub fn from_database(database: &Database) -> Self {
        let users = Arc::new(UserStore::new(database.get_connection()));
        Self::new(users, Arc::new(Argon2Credentials))
    }

    /// Process-local state with Argon2 hashing. Data is lost on exit.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryUserStore::new()), Arc::new(Argon2Credentials))
    }
}
