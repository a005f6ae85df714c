//! PostgreSQL-backed `EventRepository` implementation using Diesel ORM.
//!
//! [`EventsFilter`] is translated into `ILIKE` and range predicates on a
//! boxed query; the filter's `matches` method is the reference for what
//! these predicates must select.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{EventRepository, RepositoryError};
use crate::domain::{CompanyId, Event, EventId, EventsFilter, Page};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::diesel_helpers::contains_pattern;
use super::models::{EventRow, EventUpdate, NewEventRow};
use super::pool::DbPool;
use super::schema::events;

/// Diesel-backed implementation of the `EventRepository` port.
#[derive(Clone)]
pub struct DieselEventRepository {
    pool: DbPool,
}

impl DieselEventRepository {
    /// Create a repository backed by `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn filtered(filter: &EventsFilter) -> events::BoxedQuery<'static, diesel::pg::Pg> {
    let mut query = events::table.into_boxed();
    if let Some(city) = filter.city.as_deref() {
        query = query.filter(events::city.ilike(contains_pattern(city)));
    }
    if let Some(from) = filter.date_from {
        query = query.filter(events::date.ge(from));
    }
    if let Some(to) = filter.date_to {
        query = query.filter(events::date.le(to));
    }
    if let Some(term) = filter.search.as_deref() {
        let pattern = contains_pattern(term);
        query = query.filter(
            events::title
                .ilike(pattern.clone())
                .or(events::description.assume_not_null().ilike(pattern.clone()))
                .or(events::venue.ilike(pattern)),
        );
    }
    query
}

#[async_trait]
impl EventRepository for DieselEventRepository {
    async fn insert(&self, event: &Event) -> Result<(), RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(events::table)
            .values(NewEventRow::from(event))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn update(&self, event: &Event) -> Result<(), RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(events::table.find(event.id.as_uuid()))
            .set(EventUpdate::from(event))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        if updated == 0 {
            return Err(RepositoryError::not_found("event not found"));
        }
        Ok(())
    }

    async fn delete(&self, id: &EventId) -> Result<bool, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let removed = diesel::delete(events::table.find(id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(removed > 0)
    }

    async fn find_by_id(&self, id: &EventId) -> Result<Option<Event>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<EventRow> = events::table
            .find(id.as_uuid())
            .select(EventRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(Event::from))
    }

    async fn list(&self, filter: &EventsFilter, page: Page) -> Result<Vec<Event>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<EventRow> = filtered(filter)
            .select(EventRow::as_select())
            .order_by((events::date.asc(), events::id.asc()))
            .limit(page.limit())
            .offset(page.offset())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(Event::from).collect())
    }

    async fn list_by_company(&self, company: &CompanyId) -> Result<Vec<Event>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<EventRow> = events::table
            .filter(events::organizer_company_id.eq(company.as_uuid()))
            .select(EventRow::as_select())
            .order_by((events::date.asc(), events::id.asc()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(Event::from).collect())
    }
}
