//! Database reachability probe used by the health endpoint.

use async_trait::async_trait;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{RepositoryError, StorageHealth};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::pool::DbPool;

/// Runs `SELECT 1` over a pooled connection.
#[derive(Clone)]
pub struct DieselStorageHealth {
    pool: DbPool,
}

impl DieselStorageHealth {
    /// Ping storage through `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StorageHealth for DieselStorageHealth {
    async fn ping(&self) -> Result<(), RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::sql_query("SELECT 1")
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }
}
