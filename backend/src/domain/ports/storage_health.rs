//! Port used by the health endpoint to probe the backing store.
use async_trait::async_trait;

use super::RepositoryError;

/// Cheap reachability check for the backing store.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StorageHealth: Send + Sync {
    /// Round-trip to storage, failing when it cannot be reached.
    async fn ping(&self) -> Result<(), RepositoryError>;

    /// Short backend label reported by the health endpoint.
    fn backend(&self) -> &'static str;
}
