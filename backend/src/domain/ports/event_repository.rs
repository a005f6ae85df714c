//! Port abstraction for event persistence.
use async_trait::async_trait;

use crate::domain::{CompanyId, Event, EventId, EventsFilter, Page};

use super::RepositoryError;

/// Event persistence.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn insert(&self, event: &Event) -> Result<(), RepositoryError>;

    async fn update(&self, event: &Event) -> Result<(), RepositoryError>;

    /// Delete an event. Fails with `Conflict` while trips still reference it.
    async fn delete(&self, id: &EventId) -> Result<bool, RepositoryError>;

    async fn find_by_id(&self, id: &EventId) -> Result<Option<Event>, RepositoryError>;

    /// Filtered page of events ordered by date ascending.
    async fn list(&self, filter: &EventsFilter, page: Page) -> Result<Vec<Event>, RepositoryError>;

    /// Events organised by a company, ordered by date ascending.
    async fn list_by_company(&self, company: &CompanyId) -> Result<Vec<Event>, RepositoryError>;
}
