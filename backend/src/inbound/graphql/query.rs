//! Read-only GraphQL operations.

use async_graphql::{Context, ID, Object, ResultExt};

use crate::domain::{DEFAULT_LIMIT, Page};

use super::context::{caller, parse_id, services};
use super::inputs::{EventsFilterInput, TripsFilterInput};
use super::types::{
    CompanyObject, CostItemObject, EventObject, ParticipantObject, TripObject, UserObject,
    VehicleOfferObject,
};

fn page(limit: Option<i64>, offset: Option<i64>) -> async_graphql::Result<Page> {
    Page::new(limit, offset).extend()
}

/// Root of every query.
#[derive(Default)]
pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// The authenticated caller, or null for anonymous requests.
    async fn me(&self, ctx: &Context<'_>) -> async_graphql::Result<Option<UserObject>> {
        let user = services(ctx)?.auth.me(&caller(ctx)).await.extend()?;
        Ok(user.map(UserObject))
    }

    /// Events ordered by date.
    async fn events(
        &self,
        ctx: &Context<'_>,
        filter: Option<EventsFilterInput>,
        #[graphql(default_with = "Some(DEFAULT_LIMIT)")] limit: Option<i64>,
        #[graphql(default_with = "Some(0)")] offset: Option<i64>,
    ) -> async_graphql::Result<Vec<EventObject>> {
        let page = page(limit, offset)?;
        let filter = filter.unwrap_or_default().into();
        let events = services(ctx)?.events.list(filter, page).await.extend()?;
        Ok(events.into_iter().map(EventObject).collect())
    }

    async fn event(&self, ctx: &Context<'_>, id: ID) -> async_graphql::Result<Option<EventObject>> {
        let id = parse_id("id", &id).extend()?;
        let event = services(ctx)?.events.get(&id).await.extend()?;
        Ok(event.map(EventObject))
    }

    /// Trips ordered by date.
    async fn trips(
        &self,
        ctx: &Context<'_>,
        filter: Option<TripsFilterInput>,
        #[graphql(default_with = "Some(DEFAULT_LIMIT)")] limit: Option<i64>,
        #[graphql(default_with = "Some(0)")] offset: Option<i64>,
    ) -> async_graphql::Result<Vec<TripObject>> {
        let page = page(limit, offset)?;
        let filter = filter.unwrap_or_default().into_filter().extend()?;
        let trips = services(ctx)?.trips.list(filter, page).await.extend()?;
        Ok(trips.into_iter().map(TripObject).collect())
    }

    async fn trip(&self, ctx: &Context<'_>, id: ID) -> async_graphql::Result<Option<TripObject>> {
        let id = parse_id("id", &id).extend()?;
        let trip = services(ctx)?.trips.get(&id).await.extend()?;
        Ok(trip.map(TripObject))
    }

    /// Case-insensitive join code lookup.
    async fn trip_by_code(
        &self,
        ctx: &Context<'_>,
        code: String,
    ) -> async_graphql::Result<Option<TripObject>> {
        let trip = services(ctx)?.trips.by_code(&code).await.extend()?;
        Ok(trip.map(TripObject))
    }

    /// Companies, newest first.
    async fn companies(
        &self,
        ctx: &Context<'_>,
        #[graphql(default_with = "Some(DEFAULT_LIMIT)")] limit: Option<i64>,
        #[graphql(default_with = "Some(0)")] offset: Option<i64>,
    ) -> async_graphql::Result<Vec<CompanyObject>> {
        let page = page(limit, offset)?;
        let companies = services(ctx)?.companies.list(page).await.extend()?;
        Ok(companies.into_iter().map(CompanyObject).collect())
    }

    async fn my_companies(&self, ctx: &Context<'_>) -> async_graphql::Result<Vec<CompanyObject>> {
        let companies = services(ctx)?.companies.mine(&caller(ctx)).await.extend()?;
        Ok(companies.into_iter().map(CompanyObject).collect())
    }

    /// Trips the caller organises.
    async fn my_trips(&self, ctx: &Context<'_>) -> async_graphql::Result<Vec<TripObject>> {
        let trips = services(ctx)?.trips.mine(&caller(ctx)).await.extend()?;
        Ok(trips.into_iter().map(TripObject).collect())
    }

    async fn my_participations(
        &self,
        ctx: &Context<'_>,
    ) -> async_graphql::Result<Vec<ParticipantObject>> {
        let memberships = services(ctx)?
            .participants
            .mine(&caller(ctx))
            .await
            .extend()?;
        Ok(memberships.into_iter().map(ParticipantObject).collect())
    }

    async fn cost_items(
        &self,
        ctx: &Context<'_>,
        trip_id: ID,
    ) -> async_graphql::Result<Vec<CostItemObject>> {
        let trip_id = parse_id("tripId", &trip_id).extend()?;
        let items = services(ctx)?.cost_items.for_trip(&trip_id).await.extend()?;
        Ok(items.into_iter().map(CostItemObject).collect())
    }

    async fn cost_item(
        &self,
        ctx: &Context<'_>,
        id: ID,
    ) -> async_graphql::Result<Option<CostItemObject>> {
        let id = parse_id("id", &id).extend()?;
        let item = services(ctx)?.cost_items.get(&id).await.extend()?;
        Ok(item.map(CostItemObject))
    }

    /// Offers attached to one trip, or every offer when no trip is given.
    async fn vehicle_offers(
        &self,
        ctx: &Context<'_>,
        trip_id: Option<ID>,
    ) -> async_graphql::Result<Vec<VehicleOfferObject>> {
        let trip_id = trip_id
            .map(|raw| parse_id("tripId", &raw))
            .transpose()
            .extend()?;
        let offers = services(ctx)?.vehicle_offers.list(trip_id).await.extend()?;
        Ok(offers.into_iter().map(VehicleOfferObject).collect())
    }

    async fn vehicle_offer(
        &self,
        ctx: &Context<'_>,
        id: ID,
    ) -> async_graphql::Result<Option<VehicleOfferObject>> {
        let id = parse_id("id", &id).extend()?;
        let offer = services(ctx)?.vehicle_offers.get(&id).await.extend()?;
        Ok(offer.map(VehicleOfferObject))
    }
}
