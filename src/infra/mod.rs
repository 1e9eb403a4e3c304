//! Infrastructure layer - External systems integration
//!
//! - Database connection and migrations
//! - User store implementations (PostgreSQL, in-memory)

pub mod db;
pub mod repositories;

pub use db::{Database, Migrator};
pub use repositories::{InMemoryUserStore, UserRepository, UserStore};

#[cfg(any(test, feature = "test-utils"))]
pub use repositories::MockUserRepository;
