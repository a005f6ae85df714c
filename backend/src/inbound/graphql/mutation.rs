//! State-changing GraphQL operations.
//!
//! Resolvers only parse arguments and delegate; identity, ownership and
//! state rules are enforced by the domain services.

use async_graphql::{Context, ID, Object, ResultExt};

use super::context::{caller, parse_id, services};
use super::inputs::{
    CreateCompanyInput, CreateCostItemInput, CreateEventInput, CreateTripInput,
    CreateVehicleOfferInput, SignupInput, login_credentials,
};
use super::types::{
    AuthPayloadObject, CompanyObject, CostItemObject, EventObject, ParticipantObject, TripObject,
    VehicleOfferObject,
};

/// Root of every mutation.
#[derive(Default)]
pub struct MutationRoot;

#[Object]
impl MutationRoot {
    /// Register an account and return a token for it.
    async fn signup(
        &self,
        ctx: &Context<'_>,
        input: SignupInput,
    ) -> async_graphql::Result<AuthPayloadObject> {
        let request = input.into_request().extend()?;
        let payload = services(ctx)?.auth.signup(request).await.extend()?;
        Ok(AuthPayloadObject(payload))
    }

    async fn login(
        &self,
        ctx: &Context<'_>,
        email: String,
        #[graphql(secret)] password: String,
    ) -> async_graphql::Result<AuthPayloadObject> {
        let credentials = login_credentials(&email, &password).extend()?;
        let payload = services(ctx)?.auth.login(credentials).await.extend()?;
        Ok(AuthPayloadObject(payload))
    }

    async fn create_company(
        &self,
        ctx: &Context<'_>,
        input: CreateCompanyInput,
    ) -> async_graphql::Result<CompanyObject> {
        let draft = input.into_draft().extend()?;
        let company = services(ctx)?
            .companies
            .create(&caller(ctx), draft)
            .await
            .extend()?;
        Ok(CompanyObject(company))
    }

    async fn update_company(
        &self,
        ctx: &Context<'_>,
        id: ID,
        input: CreateCompanyInput,
    ) -> async_graphql::Result<CompanyObject> {
        let id = parse_id("id", &id).extend()?;
        let draft = input.into_draft().extend()?;
        let company = services(ctx)?
            .companies
            .update(&caller(ctx), &id, draft)
            .await
            .extend()?;
        Ok(CompanyObject(company))
    }

    async fn delete_company(&self, ctx: &Context<'_>, id: ID) -> async_graphql::Result<bool> {
        let id = parse_id("id", &id).extend()?;
        services(ctx)?
            .companies
            .delete(&caller(ctx), &id)
            .await
            .extend()
    }

    async fn create_event(
        &self,
        ctx: &Context<'_>,
        input: CreateEventInput,
    ) -> async_graphql::Result<EventObject> {
        let draft = input.into_draft().extend()?;
        let event = services(ctx)?
            .events
            .create(&caller(ctx), draft)
            .await
            .extend()?;
        Ok(EventObject(event))
    }

    async fn update_event(
        &self,
        ctx: &Context<'_>,
        id: ID,
        input: CreateEventInput,
    ) -> async_graphql::Result<EventObject> {
        let id = parse_id("id", &id).extend()?;
        let draft = input.into_draft().extend()?;
        let event = services(ctx)?
            .events
            .update(&caller(ctx), &id, draft)
            .await
            .extend()?;
        Ok(EventObject(event))
    }

    /// Fails with a conflict while trips still reference the event.
    async fn delete_event(&self, ctx: &Context<'_>, id: ID) -> async_graphql::Result<bool> {
        let id = parse_id("id", &id).extend()?;
        services(ctx)?
            .events
            .delete(&caller(ctx), &id)
            .await
            .extend()
    }

    /// Create a trip; the caller becomes its organizer and first participant.
    async fn create_trip(
        &self,
        ctx: &Context<'_>,
        input: CreateTripInput,
    ) -> async_graphql::Result<TripObject> {
        let draft = input.into_draft().extend()?;
        let trip = services(ctx)?
            .trips
            .create(&caller(ctx), draft)
            .await
            .extend()?;
        Ok(TripObject(trip))
    }

    async fn update_trip(
        &self,
        ctx: &Context<'_>,
        id: ID,
        input: CreateTripInput,
    ) -> async_graphql::Result<TripObject> {
        let id = parse_id("id", &id).extend()?;
        let draft = input.into_draft().extend()?;
        let trip = services(ctx)?
            .trips
            .update(&caller(ctx), &id, draft)
            .await
            .extend()?;
        Ok(TripObject(trip))
    }

    /// Delete a trip with its participants and cost items. Vehicle offers
    /// pointing at it are detached, not deleted.
    async fn delete_trip(&self, ctx: &Context<'_>, id: ID) -> async_graphql::Result<bool> {
        let id = parse_id("id", &id).extend()?;
        services(ctx)?
            .trips
            .delete(&caller(ctx), &id)
            .await
            .extend()
    }

    async fn join_trip(
        &self,
        ctx: &Context<'_>,
        trip_id: ID,
        code: Option<String>,
    ) -> async_graphql::Result<ParticipantObject> {
        let trip_id = parse_id("tripId", &trip_id).extend()?;
        let participant = services(ctx)?
            .participants
            .join(&caller(ctx), &trip_id, code.as_deref())
            .await
            .extend()?;
        Ok(ParticipantObject(participant))
    }

    async fn leave_trip(
        &self,
        ctx: &Context<'_>,
        participant_id: ID,
    ) -> async_graphql::Result<bool> {
        let participant_id = parse_id("participantId", &participant_id).extend()?;
        services(ctx)?
            .participants
            .leave(&caller(ctx), &participant_id)
            .await
            .extend()
    }

    async fn create_cost_item(
        &self,
        ctx: &Context<'_>,
        input: CreateCostItemInput,
    ) -> async_graphql::Result<CostItemObject> {
        let draft = input.into_draft().extend()?;
        let item = services(ctx)?
            .cost_items
            .create(&caller(ctx), draft)
            .await
            .extend()?;
        Ok(CostItemObject(item))
    }

    async fn update_cost_item(
        &self,
        ctx: &Context<'_>,
        id: ID,
        input: CreateCostItemInput,
    ) -> async_graphql::Result<CostItemObject> {
        let id = parse_id("id", &id).extend()?;
        let draft = input.into_draft().extend()?;
        let item = services(ctx)?
            .cost_items
            .update(&caller(ctx), &id, draft)
            .await
            .extend()?;
        Ok(CostItemObject(item))
    }

    async fn delete_cost_item(&self, ctx: &Context<'_>, id: ID) -> async_graphql::Result<bool> {
        let id = parse_id("id", &id).extend()?;
        services(ctx)?
            .cost_items
            .delete(&caller(ctx), &id)
            .await
            .extend()
    }

    async fn create_vehicle_offer(
        &self,
        ctx: &Context<'_>,
        input: CreateVehicleOfferInput,
    ) -> async_graphql::Result<VehicleOfferObject> {
        let draft = input.into_draft().extend()?;
        let offer = services(ctx)?
            .vehicle_offers
            .create(&caller(ctx), draft)
            .await
            .extend()?;
        Ok(VehicleOfferObject(offer))
    }

    async fn update_vehicle_offer(
        &self,
        ctx: &Context<'_>,
        id: ID,
        input: CreateVehicleOfferInput,
    ) -> async_graphql::Result<VehicleOfferObject> {
        let id = parse_id("id", &id).extend()?;
        let draft = input.into_draft().extend()?;
        let offer = services(ctx)?
            .vehicle_offers
            .update(&caller(ctx), &id, draft)
            .await
            .extend()?;
        Ok(VehicleOfferObject(offer))
    }

    async fn delete_vehicle_offer(
        &self,
        ctx: &Context<'_>,
        id: ID,
    ) -> async_graphql::Result<bool> {
        let id = parse_id("id", &id).extend()?;
        services(ctx)?
            .vehicle_offers
            .delete(&caller(ctx), &id)
            .await
            .extend()
    }
}
