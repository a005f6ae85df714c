//! PostgreSQL-backed `TripRepository` implementation using Diesel ORM.
//!
//! Creation and deletion run inside a single transaction each: the trip and
//! its organizer membership are inserted together, and deletion clears
//! memberships, cost items and offer links before removing the trip row.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use tracing::debug;

use crate::domain::ports::{RepositoryError, TripRepository};
use crate::domain::{EventId, JoinCode, Page, Participant, Trip, TripId, TripsFilter, UserId};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::diesel_helpers::contains_pattern;
use super::models::{NewTripRow, ParticipantRow, TripRow, TripUpdate};
use super::pool::DbPool;
use super::schema::{cost_items, participants, trips, vehicle_offers};

/// Diesel-backed implementation of the `TripRepository` port.
#[derive(Clone)]
pub struct DieselTripRepository {
    pool: DbPool,
}

impl DieselTripRepository {
    /// Create a repository backed by `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn rows_to_trips(rows: Vec<TripRow>) -> Result<Vec<Trip>, RepositoryError> {
    rows.into_iter().map(Trip::try_from).collect()
}

fn filtered(filter: &TripsFilter) -> trips::BoxedQuery<'static, diesel::pg::Pg> {
    let mut query = trips::table.into_boxed();
    if let Some(event) = filter.event_id {
        query = query.filter(trips::event_id.eq(*event.as_uuid()));
    }
    if let Some(city) = filter.city.as_deref() {
        let pattern = contains_pattern(city);
        query = query.filter(
            trips::origin_city
                .ilike(pattern.clone())
                .or(trips::destination_city.ilike(pattern)),
        );
    }
    if let Some(from) = filter.date_from {
        query = query.filter(trips::date.ge(from));
    }
    if let Some(to) = filter.date_to {
        query = query.filter(trips::date.le(to));
    }
    if let Some(term) = filter.search.as_deref() {
        query = query.filter(trips::title.ilike(contains_pattern(term)));
    }
    query
}

#[async_trait]
impl TripRepository for DieselTripRepository {
    async fn create_with_organizer(
        &self,
        trip: &Trip,
        organizer: &Participant,
    ) -> Result<(), RepositoryError> {
        let trip_row = NewTripRow::from(trip);
        let participant_row = ParticipantRow::from(organizer);
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        conn.transaction(|conn| {
            async move {
                diesel::insert_into(trips::table)
                    .values(&trip_row)
                    .execute(conn)
                    .await?;
                diesel::insert_into(participants::table)
                    .values(&participant_row)
                    .execute(conn)
                    .await?;
                Ok::<_, diesel::result::Error>(())
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }

    async fn update(&self, trip: &Trip) -> Result<(), RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(trips::table.find(trip.id.as_uuid()))
            .set(TripUpdate::from(trip))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        if updated == 0 {
            return Err(RepositoryError::not_found("trip not found"));
        }
        Ok(())
    }

    async fn delete_cascade(&self, id: &TripId) -> Result<bool, RepositoryError> {
        let trip_id = *id.as_uuid();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let removed = conn
            .transaction(|conn| {
                async move {
                    let members = diesel::delete(
                        participants::table.filter(participants::trip_id.eq(trip_id)),
                    )
                    .execute(conn)
                    .await?;
                    let items =
                        diesel::delete(cost_items::table.filter(cost_items::trip_id.eq(trip_id)))
                            .execute(conn)
                            .await?;
                    let detached = diesel::update(
                        vehicle_offers::table.filter(vehicle_offers::trip_id.eq(trip_id)),
                    )
                    .set(vehicle_offers::trip_id.eq(None::<uuid::Uuid>))
                    .execute(conn)
                    .await?;
                    debug!(%trip_id, members, items, detached, "trip dependents cleared");
                    diesel::delete(trips::table.find(trip_id))
                        .execute(conn)
                        .await
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;
        Ok(removed > 0)
    }

    async fn find_by_id(&self, id: &TripId) -> Result<Option<Trip>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<TripRow> = trips::table
            .find(id.as_uuid())
            .select(TripRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(Trip::try_from).transpose()
    }

    async fn find_by_code(&self, code: &JoinCode) -> Result<Option<Trip>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<TripRow> = trips::table
            .filter(trips::code.eq(code.as_ref()))
            .select(TripRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(Trip::try_from).transpose()
    }

    async fn list(&self, filter: &TripsFilter, page: Page) -> Result<Vec<Trip>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<TripRow> = filtered(filter)
            .select(TripRow::as_select())
            .order_by((trips::date.asc(), trips::id.asc()))
            .limit(page.limit())
            .offset(page.offset())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows_to_trips(rows)
    }

    async fn list_by_organizer(&self, organizer: &UserId) -> Result<Vec<Trip>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<TripRow> = trips::table
            .filter(trips::organizer_id.eq(organizer.as_uuid()))
            .select(TripRow::as_select())
            .order_by((trips::created_at.desc(), trips::id.desc()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows_to_trips(rows)
    }

    async fn list_by_event(&self, event: &EventId) -> Result<Vec<Trip>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<TripRow> = trips::table
            .filter(trips::event_id.eq(event.as_uuid()))
            .select(TripRow::as_select())
            .order_by((trips::date.asc(), trips::id.asc()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows_to_trips(rows)
    }
}
