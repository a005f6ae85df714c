//! Port abstraction for user persistence adapters.
use async_trait::async_trait;

use crate::domain::{EmailAddress, User, UserId};

use super::RepositoryError;

/// Storage for registered accounts. Emails are unique.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user, returning `Conflict` when the email is taken.
    async fn insert(&self, user: &User) -> Result<(), RepositoryError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, RepositoryError>;

    /// Fetch a user by normalised email.
    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, RepositoryError>;
}
