//! PostgreSQL-backed `VehicleOfferRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{RepositoryError, VehicleOfferRepository};
use crate::domain::{CompanyId, TripId, VehicleOffer, VehicleOfferId};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{VehicleOfferRow, VehicleOfferUpdate};
use super::pool::DbPool;
use super::schema::vehicle_offers;

/// Diesel-backed implementation of the `VehicleOfferRepository` port.
#[derive(Clone)]
pub struct DieselVehicleOfferRepository {
    pool: DbPool,
}

impl DieselVehicleOfferRepository {
    /// Create a repository backed by `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VehicleOfferRepository for DieselVehicleOfferRepository {
    async fn insert(&self, offer: &VehicleOffer) -> Result<(), RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(vehicle_offers::table)
            .values(VehicleOfferRow::from(offer))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn update(&self, offer: &VehicleOffer) -> Result<(), RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(vehicle_offers::table.find(offer.id.as_uuid()))
            .set(VehicleOfferUpdate::from(offer))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        if updated == 0 {
            return Err(RepositoryError::not_found("vehicle offer not found"));
        }
        Ok(())
    }

    async fn delete(&self, id: &VehicleOfferId) -> Result<bool, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let removed = diesel::delete(vehicle_offers::table.find(id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(removed > 0)
    }

    async fn find_by_id(
        &self,
        id: &VehicleOfferId,
    ) -> Result<Option<VehicleOffer>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<VehicleOfferRow> = vehicle_offers::table
            .find(id.as_uuid())
            .select(VehicleOfferRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(VehicleOffer::from))
    }

    async fn list(&self, trip: Option<TripId>) -> Result<Vec<VehicleOffer>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let mut query = vehicle_offers::table.into_boxed();
        if let Some(trip) = trip {
            query = query.filter(vehicle_offers::trip_id.eq(*trip.as_uuid()));
        }
        let rows: Vec<VehicleOfferRow> = query
            .select(VehicleOfferRow::as_select())
            .order_by((vehicle_offers::created_at.desc(), vehicle_offers::id.desc()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(VehicleOffer::from).collect())
    }

    async fn list_by_company(
        &self,
        company: &CompanyId,
    ) -> Result<Vec<VehicleOffer>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<VehicleOfferRow> = vehicle_offers::table
            .filter(vehicle_offers::company_id.eq(company.as_uuid()))
            .select(VehicleOfferRow::as_select())
            .order_by((vehicle_offers::created_at.desc(), vehicle_offers::id.desc()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(VehicleOffer::from).collect())
    }
}
