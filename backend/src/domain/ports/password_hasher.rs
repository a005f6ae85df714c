//! Port for one-way password hashing.
use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Errors raised by password hashing adapters.
    pub enum PasswordHashError {
        /// Hashing or verification failed inside the adapter.
        Hash { message: String } => "password hashing failed: {message}",
    }
}

/// Hashes passwords for storage and checks candidates against stored hashes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PasswordHasher: Send + Sync {
    async fn hash(&self, password: &str) -> Result<String, PasswordHashError>;

    /// `Ok(false)` for a wrong password; `Err` only for adapter failures
    /// such as a corrupt stored hash.
    async fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordHashError>;
}
