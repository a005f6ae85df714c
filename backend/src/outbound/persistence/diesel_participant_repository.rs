//! PostgreSQL-backed `ParticipantRepository` implementation using Diesel ORM.
//!
//! The `participants_user_id_trip_id_key` unique constraint is the final
//! guard against duplicate joins; a violation surfaces as `Conflict`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{ParticipantRepository, RepositoryError};
use crate::domain::{Participant, ParticipantId, TripId, UserId};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::ParticipantRow;
use super::pool::DbPool;
use super::schema::participants;

/// Diesel-backed implementation of the `ParticipantRepository` port.
#[derive(Clone)]
pub struct DieselParticipantRepository {
    pool: DbPool,
}

impl DieselParticipantRepository {
    /// Create a repository backed by `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ParticipantRepository for DieselParticipantRepository {
    async fn insert(&self, participant: &Participant) -> Result<(), RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(participants::table)
            .values(ParticipantRow::from(participant))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn delete(&self, id: &ParticipantId) -> Result<bool, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let removed = diesel::delete(participants::table.find(id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(removed > 0)
    }

    async fn find_by_id(&self, id: &ParticipantId) -> Result<Option<Participant>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<ParticipantRow> = participants::table
            .find(id.as_uuid())
            .select(ParticipantRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(Participant::from))
    }

    async fn find_by_user_and_trip(
        &self,
        user: &UserId,
        trip: &TripId,
    ) -> Result<Option<Participant>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<ParticipantRow> = participants::table
            .filter(
                participants::user_id
                    .eq(user.as_uuid())
                    .and(participants::trip_id.eq(trip.as_uuid())),
            )
            .select(ParticipantRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(Participant::from))
    }

    async fn list_by_trip(&self, trip: &TripId) -> Result<Vec<Participant>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<ParticipantRow> = participants::table
            .filter(participants::trip_id.eq(trip.as_uuid()))
            .select(ParticipantRow::as_select())
            .order_by((participants::joined_at.asc(), participants::id.asc()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(Participant::from).collect())
    }

    async fn list_by_user(&self, user: &UserId) -> Result<Vec<Participant>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<ParticipantRow> = participants::table
            .filter(participants::user_id.eq(user.as_uuid()))
            .select(ParticipantRow::as_select())
            .order_by((participants::joined_at.desc(), participants::id.desc()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(Participant::from).collect())
    }

    async fn count_by_trip(&self, trip: &TripId) -> Result<i64, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        participants::table
            .filter(participants::trip_id.eq(trip.as_uuid()))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)
    }
}
