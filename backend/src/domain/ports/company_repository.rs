//! Port abstraction for company persistence.
use async_trait::async_trait;

use crate::domain::{Company, CompanyId, Page, UserId};

use super::RepositoryError;

/// Company persistence.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CompanyRepository: Send + Sync {
    async fn insert(&self, company: &Company) -> Result<(), RepositoryError>;

    /// Overwrite the mutable columns of an existing company.
    async fn update(&self, company: &Company) -> Result<(), RepositoryError>;

    /// Delete a company. Returns `false` when nothing was removed.
    ///
    /// Fails with `Conflict` while events or offers still reference it.
    async fn delete(&self, id: &CompanyId) -> Result<bool, RepositoryError>;

    async fn find_by_id(&self, id: &CompanyId) -> Result<Option<Company>, RepositoryError>;

    /// One page of companies, newest first.
    async fn list(&self, page: Page) -> Result<Vec<Company>, RepositoryError>;

    /// Companies owned by `owner`, oldest first.
    async fn list_by_owner(&self, owner: &UserId) -> Result<Vec<Company>, RepositoryError>;
}
