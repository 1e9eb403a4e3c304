//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure to fulfill
//! application use cases. They depend on abstractions (traits) for
//! dependency inversion.

mod auth_service;
mod credentials;

pub use auth_service::{AuthService, Authenticator};
pub use credentials::{Argon2Credentials, CredentialService};

#[cfg(any(test, feature = "test-utils"))]
pub use credentials::MockCredentialService;
