//! GraphQL output types.
//!
//! Each object wraps a domain entity. Relations are resolved lazily with one
//! service call per parent, so nested selections cost one lookup each.

use async_graphql::{Context, Enum, ID, Object, ResultExt};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::domain::{
    AuthPayload, Company, CostItem, Error, Event, Participant, Role, Trip, User, VehicleOffer,
};

use super::context::services;

/// Account role exposed as the `Role` enum.
#[derive(Enum, Debug, Clone, Copy, PartialEq, Eq)]
#[graphql(name = "Role")]
pub enum RoleValue {
    User,
    Company,
    Organizer,
}

fn present<T>(value: Option<T>, missing: &str) -> async_graphql::Result<T> {
    value.ok_or_else(|| Error::not_found(missing)).extend()
}

/// A registered account.
pub struct UserObject(pub User);

#[Object(name = "User")]
impl UserObject {
    async fn id(&self) -> ID {
        ID(self.0.id.to_string())
    }

    async fn name(&self) -> &str {
        &self.0.name
    }

    async fn email(&self) -> &str {
        self.0.email.as_ref()
    }

    async fn avatar_url(&self) -> Option<&str> {
        self.0.avatar_url.as_deref()
    }

    async fn profile_public_info(&self) -> Option<&str> {
        self.0.profile_public_info.as_deref()
    }

    async fn role(&self) -> RoleValue {
        self.0.role.into()
    }

    async fn created_at(&self) -> DateTime<Utc> {
        self.0.created_at
    }

    async fn organized_trips(&self, ctx: &Context<'_>) -> async_graphql::Result<Vec<TripObject>> {
        let trips = services(ctx)?
            .trips
            .for_organizer(&self.0.id)
            .await
            .extend()?;
        Ok(trips.into_iter().map(TripObject).collect())
    }

    async fn participations(
        &self,
        ctx: &Context<'_>,
    ) -> async_graphql::Result<Vec<ParticipantObject>> {
        let memberships = services(ctx)?
            .participants
            .for_user(&self.0.id)
            .await
            .extend()?;
        Ok(memberships.into_iter().map(ParticipantObject).collect())
    }

    async fn owned_companies(
        &self,
        ctx: &Context<'_>,
    ) -> async_graphql::Result<Vec<CompanyObject>> {
        let companies = services(ctx)?
            .companies
            .for_owner(&self.0.id)
            .await
            .extend()?;
        Ok(companies.into_iter().map(CompanyObject).collect())
    }
}

/// A company operating events and vehicle offers.
pub struct CompanyObject(pub Company);

#[Object(name = "Company")]
impl CompanyObject {
    async fn id(&self) -> ID {
        ID(self.0.id.to_string())
    }

    async fn name(&self) -> &str {
        &self.0.name
    }

    async fn description(&self) -> Option<&str> {
        self.0.description.as_deref()
    }

    async fn contact_email(&self) -> &str {
        self.0.contact_email.as_ref()
    }

    async fn created_at(&self) -> DateTime<Utc> {
        self.0.created_at
    }

    async fn owner(&self, ctx: &Context<'_>) -> async_graphql::Result<UserObject> {
        let user = services(ctx)?.auth.user(&self.0.owner_id).await.extend()?;
        present(user, "user not found").map(UserObject)
    }

    async fn events(&self, ctx: &Context<'_>) -> async_graphql::Result<Vec<EventObject>> {
        let events = services(ctx)?
            .events
            .for_company(&self.0.id)
            .await
            .extend()?;
        Ok(events.into_iter().map(EventObject).collect())
    }

    async fn vehicle_offers(
        &self,
        ctx: &Context<'_>,
    ) -> async_graphql::Result<Vec<VehicleOfferObject>> {
        let offers = services(ctx)?
            .vehicle_offers
            .for_company(&self.0.id)
            .await
            .extend()?;
        Ok(offers.into_iter().map(VehicleOfferObject).collect())
    }
}

/// A dated happening trips are organised around.
pub struct EventObject(pub Event);

#[Object(name = "Event")]
impl EventObject {
    async fn id(&self) -> ID {
        ID(self.0.id.to_string())
    }

    async fn title(&self) -> &str {
        &self.0.title
    }

    async fn description(&self) -> Option<&str> {
        self.0.description.as_deref()
    }

    async fn city(&self) -> &str {
        &self.0.city
    }

    async fn venue(&self) -> &str {
        &self.0.venue
    }

    async fn date(&self) -> DateTime<Utc> {
        self.0.date
    }

    async fn created_at(&self) -> DateTime<Utc> {
        self.0.created_at
    }

    async fn organizer_company(
        &self,
        ctx: &Context<'_>,
    ) -> async_graphql::Result<Option<CompanyObject>> {
        let Some(company_id) = self.0.organizer_company_id else {
            return Ok(None);
        };
        let company = services(ctx)?.companies.get(&company_id).await.extend()?;
        Ok(company.map(CompanyObject))
    }

    async fn trips(&self, ctx: &Context<'_>) -> async_graphql::Result<Vec<TripObject>> {
        let trips = services(ctx)?.trips.for_event(&self.0.id).await.extend()?;
        Ok(trips.into_iter().map(TripObject).collect())
    }
}

/// A group outing to an event.
pub struct TripObject(pub Trip);

#[Object(name = "Trip")]
impl TripObject {
    async fn id(&self) -> ID {
        ID(self.0.id.to_string())
    }

    async fn title(&self) -> &str {
        &self.0.title
    }

    async fn origin_city(&self) -> &str {
        &self.0.origin_city
    }

    async fn destination_city(&self) -> &str {
        &self.0.destination_city
    }

    async fn date(&self) -> DateTime<Utc> {
        self.0.date
    }

    async fn code(&self) -> &str {
        self.0.code.as_ref()
    }

    async fn created_at(&self) -> DateTime<Utc> {
        self.0.created_at
    }

    async fn event(&self, ctx: &Context<'_>) -> async_graphql::Result<EventObject> {
        let event = services(ctx)?.events.get(&self.0.event_id).await.extend()?;
        present(event, "event not found").map(EventObject)
    }

    async fn organizer(&self, ctx: &Context<'_>) -> async_graphql::Result<UserObject> {
        let user = services(ctx)?
            .auth
            .user(&self.0.organizer_id)
            .await
            .extend()?;
        present(user, "user not found").map(UserObject)
    }

    async fn participants(
        &self,
        ctx: &Context<'_>,
    ) -> async_graphql::Result<Vec<ParticipantObject>> {
        let members = services(ctx)?
            .participants
            .for_trip(&self.0.id)
            .await
            .extend()?;
        Ok(members.into_iter().map(ParticipantObject).collect())
    }

    async fn cost_items(&self, ctx: &Context<'_>) -> async_graphql::Result<Vec<CostItemObject>> {
        let items = services(ctx)?
            .cost_items
            .for_trip(&self.0.id)
            .await
            .extend()?;
        Ok(items.into_iter().map(CostItemObject).collect())
    }

    async fn vehicle_offers(
        &self,
        ctx: &Context<'_>,
    ) -> async_graphql::Result<Vec<VehicleOfferObject>> {
        let offers = services(ctx)?
            .vehicle_offers
            .list(Some(self.0.id))
            .await
            .extend()?;
        Ok(offers.into_iter().map(VehicleOfferObject).collect())
    }

    /// Current head count, organizer included.
    async fn total_participants(&self, ctx: &Context<'_>) -> async_graphql::Result<i64> {
        services(ctx)?
            .trips
            .participant_count(&self.0.id)
            .await
            .extend()
    }

    /// Sum of every cost item recorded for the trip.
    async fn total_costs(&self, ctx: &Context<'_>) -> async_graphql::Result<Decimal> {
        services(ctx)?.trips.total_costs(&self.0.id).await.extend()
    }
}

/// Membership of a user in a trip.
pub struct ParticipantObject(pub Participant);

#[Object(name = "Participant")]
impl ParticipantObject {
    async fn id(&self) -> ID {
        ID(self.0.id.to_string())
    }

    async fn joined_at(&self) -> DateTime<Utc> {
        self.0.joined_at
    }

    async fn profile_public_info(&self) -> Option<&str> {
        self.0.profile_public_info.as_deref()
    }

    async fn user(&self, ctx: &Context<'_>) -> async_graphql::Result<UserObject> {
        let user = services(ctx)?.auth.user(&self.0.user_id).await.extend()?;
        present(user, "user not found").map(UserObject)
    }

    async fn trip(&self, ctx: &Context<'_>) -> async_graphql::Result<TripObject> {
        let trip = services(ctx)?.trips.get(&self.0.trip_id).await.extend()?;
        present(trip, "trip not found").map(TripObject)
    }
}

/// A shared expense split evenly among current participants.
pub struct CostItemObject(pub CostItem);

#[Object(name = "CostItem")]
impl CostItemObject {
    async fn id(&self) -> ID {
        ID(self.0.id.to_string())
    }

    async fn label(&self) -> &str {
        &self.0.label
    }

    async fn total_amount(&self) -> Decimal {
        self.0.total_amount
    }

    /// Total divided by the current head count, or the total itself when
    /// the trip has no participants.
    async fn per_person_share(&self, ctx: &Context<'_>) -> async_graphql::Result<Decimal> {
        services(ctx)?
            .cost_items
            .per_person_share(&self.0)
            .await
            .extend()
    }

    async fn created_at(&self) -> DateTime<Utc> {
        self.0.created_at
    }

    async fn trip(&self, ctx: &Context<'_>) -> async_graphql::Result<TripObject> {
        let trip = services(ctx)?.trips.get(&self.0.trip_id).await.extend()?;
        present(trip, "trip not found").map(TripObject)
    }

    async fn creator(&self, ctx: &Context<'_>) -> async_graphql::Result<UserObject> {
        let user = services(ctx)?.auth.user(&self.0.creator_id).await.extend()?;
        present(user, "user not found").map(UserObject)
    }
}

/// A transport listing posted by a company.
pub struct VehicleOfferObject(pub VehicleOffer);

#[Object(name = "VehicleOffer")]
impl VehicleOfferObject {
    async fn id(&self) -> ID {
        ID(self.0.id.to_string())
    }

    async fn capacity(&self) -> i32 {
        self.0.capacity
    }

    async fn price_per_person(&self) -> Option<Decimal> {
        self.0.price_per_person
    }

    async fn pickup_location(&self) -> &str {
        &self.0.pickup_location
    }

    async fn pickup_time(&self) -> DateTime<Utc> {
        self.0.pickup_time
    }

    async fn notes(&self) -> Option<&str> {
        self.0.notes.as_deref()
    }

    async fn created_at(&self) -> DateTime<Utc> {
        self.0.created_at
    }

    async fn company(&self, ctx: &Context<'_>) -> async_graphql::Result<CompanyObject> {
        let company = services(ctx)?
            .companies
            .get(&self.0.company_id)
            .await
            .extend()?;
        present(company, "company not found").map(CompanyObject)
    }

    async fn trip(&self, ctx: &Context<'_>) -> async_graphql::Result<Option<TripObject>> {
        let Some(trip_id) = self.0.trip_id else {
            return Ok(None);
        };
        let trip = services(ctx)?.trips.get(&trip_id).await.extend()?;
        Ok(trip.map(TripObject))
    }
}

/// Token plus the account it was issued for.
pub struct AuthPayloadObject(pub AuthPayload);

#[Object(name = "AuthPayload")]
impl AuthPayloadObject {
    async fn token(&self) -> &str {
        &self.0.token
    }

    async fn user(&self) -> UserObject {
        UserObject(self.0.user.clone())
    }
}

impl From<Role> for RoleValue {
    fn from(value: Role) -> Self {
        match value {
            Role::User => Self::User,
            Role::Company => Self::Company,
            Role::Organizer => Self::Organizer,
        }
    }
}

impl From<RoleValue> for Role {
    fn from(value: RoleValue) -> Self {
        match value {
            RoleValue::User => Self::User,
            RoleValue::Company => Self::Company,
            RoleValue::Organizer => Self::Organizer,
        }
    }
}
