//! PostgreSQL-backed `CostItemRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{CostItemRepository, RepositoryError};
use crate::domain::{CostItem, CostItemId, TripId};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{CostItemRow, CostItemUpdate};
use super::pool::DbPool;
use super::schema::cost_items;

/// Diesel-backed implementation of the `CostItemRepository` port.
#[derive(Clone)]
pub struct DieselCostItemRepository {
    pool: DbPool,
}

impl DieselCostItemRepository {
    /// Create a repository backed by `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CostItemRepository for DieselCostItemRepository {
    async fn insert(&self, item: &CostItem) -> Result<(), RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(cost_items::table)
            .values(CostItemRow::from(item))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn update(&self, item: &CostItem) -> Result<(), RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(cost_items::table.find(item.id.as_uuid()))
            .set(CostItemUpdate {
                label: &item.label,
                total_amount: item.total_amount,
            })
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        if updated == 0 {
            return Err(RepositoryError::not_found("cost item not found"));
        }
        Ok(())
    }

    async fn delete(&self, id: &CostItemId) -> Result<bool, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let removed = diesel::delete(cost_items::table.find(id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(removed > 0)
    }

    async fn find_by_id(&self, id: &CostItemId) -> Result<Option<CostItem>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<CostItemRow> = cost_items::table
            .find(id.as_uuid())
            .select(CostItemRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(CostItem::from))
    }

    async fn list_by_trip(&self, trip: &TripId) -> Result<Vec<CostItem>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<CostItemRow> = cost_items::table
            .filter(cost_items::trip_id.eq(trip.as_uuid()))
            .select(CostItemRow::as_select())
            .order_by((cost_items::created_at.desc(), cost_items::id.desc()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(CostItem::from).collect())
    }
}
