//! Port abstraction for cost item persistence.
use async_trait::async_trait;

use crate::domain::{CostItem, CostItemId, TripId};

use super::RepositoryError;

/// Cost item persistence.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CostItemRepository: Send + Sync {
    async fn insert(&self, item: &CostItem) -> Result<(), RepositoryError>;

    async fn update(&self, item: &CostItem) -> Result<(), RepositoryError>;

    async fn delete(&self, id: &CostItemId) -> Result<bool, RepositoryError>;

    async fn find_by_id(&self, id: &CostItemId) -> Result<Option<CostItem>, RepositoryError>;

    /// Items of a trip, newest first.
    async fn list_by_trip(&self, trip: &TripId) -> Result<Vec<CostItem>, RepositoryError>;
}
