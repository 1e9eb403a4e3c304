//! Credential service - one-way password hashing and verification.

use crate::domain::Password;
use crate::errors::AppResult;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Hashing capability injected into the auth service.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait CredentialService: Send + Sync {
    /// Produce a salted one-way hash of `plain_text`
    fn hash(&self, plain_text: &str) -> AppResult<String>;

    /// Check `plain_text` against a stored hash. Unparseable hashes never match.
    fn verify(&self, plain_text: &str, hash: &str) -> bool;
}

/// Argon2id implementation backed by the `Password` value object.
#[derive(Debug, Default, Clone, Copy)]
pub struct Argon2Credentials;

impl CredentialService for Argon2Credentials {
    fn hash(&self, plain_text: &str) -> AppResult<String> {
        Ok(Password::new(plain_text)?.into_string())
    }

    fn verify(&self, plain_text: &str, hash: &str) -> bool {
        Password::from_hash(hash.to_string()).verify(plain_text)
    }
}
