//! Cost item use-cases. Only a trip's organizer records or edits expenses.

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::info;

use crate::domain::ports::{CostItemRepository, ParticipantRepository, TripRepository};
use crate::domain::{
    Action, AuthorizationPolicy, CallerIdentity, CostItem, CostItemDraft, CostItemId, Error,
    Resource, TripId, UserId, per_person_share, require_identity,
};

/// Cost item use-cases for trip organizers.
pub struct CostItemService<C: ?Sized, T: ?Sized, P: ?Sized> {
    cost_items: Arc<C>,
    trips: Arc<T>,
    participants: Arc<P>,
    policy: AuthorizationPolicy,
}

impl<C: ?Sized, T: ?Sized, P: ?Sized> Clone for CostItemService<C, T, P> {
    fn clone(&self) -> Self {
        Self {
            cost_items: Arc::clone(&self.cost_items),
            trips: Arc::clone(&self.trips),
            participants: Arc::clone(&self.participants),
            policy: self.policy,
        }
    }
}

impl<C, T, P> CostItemService<C, T, P>
where
    C: CostItemRepository + ?Sized,
    T: TripRepository + ?Sized,
    P: ParticipantRepository + ?Sized,
{
    /// Create a new service with the given repositories.
    pub fn new(
        cost_items: Arc<C>,
        trips: Arc<T>,
        participants: Arc<P>,
        policy: AuthorizationPolicy,
    ) -> Self {
        Self {
            cost_items,
            trips,
            participants,
            policy,
        }
    }

    async fn trip_organizer(&self, trip: &TripId) -> Result<UserId, Error> {
        self.trips
            .find_by_id(trip)
            .await?
            .map(|trip| trip.organizer_id)
            .ok_or_else(|| Error::not_found("trip not found"))
    }

    async fn load(&self, id: &CostItemId) -> Result<CostItem, Error> {
        self.cost_items
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::not_found("cost item not found"))
    }

    /// Record a cost item on a trip the caller organizes.
    pub async fn create(
        &self,
        caller: &CallerIdentity,
        draft: CostItemDraft,
    ) -> Result<CostItem, Error> {
        let identity = require_identity(caller)?;
        let trip_organizer = self.trip_organizer(&draft.trip_id).await?;
        self.policy
            .authorize(&identity, Resource::NewCostItem { trip_organizer }, Action::Create)
            .into_result()?;

        let item = draft.into_cost_item(identity.user_id, Utc::now());
        self.cost_items.insert(&item).await?;
        info!(
            cost_item_id = %item.id,
            trip_id = %item.trip_id,
            amount = %item.total_amount,
            "cost item created"
        );
        Ok(item)
    }

    /// Change label and amount. The trip named in `draft` is ignored.
    pub async fn update(
        &self,
        caller: &CallerIdentity,
        id: &CostItemId,
        draft: CostItemDraft,
    ) -> Result<CostItem, Error> {
        let identity = require_identity(caller)?;
        let mut item = self.load(id).await?;
        let trip_organizer = self.trip_organizer(&item.trip_id).await?;
        self.policy
            .authorize(&identity, Resource::CostItem { trip_organizer }, Action::Update)
            .into_result()?;

        draft.apply_to(&mut item);
        self.cost_items.update(&item).await?;
        info!(cost_item_id = %item.id, amount = %item.total_amount, "cost item updated");
        Ok(item)
    }

    /// Delete a cost item of a trip the caller organizes.
    pub async fn delete(&self, caller: &CallerIdentity, id: &CostItemId) -> Result<bool, Error> {
        let identity = require_identity(caller)?;
        let item = self.load(id).await?;
        let trip_organizer = self.trip_organizer(&item.trip_id).await?;
        self.policy
            .authorize(&identity, Resource::CostItem { trip_organizer }, Action::Delete)
            .into_result()?;

        let removed = self.cost_items.delete(id).await?;
        info!(cost_item_id = %id, trip_id = %item.trip_id, removed, "cost item deleted");
        Ok(removed)
    }

    /// Items of a trip, newest first.
    pub async fn for_trip(&self, trip: &TripId) -> Result<Vec<CostItem>, Error> {
        Ok(self.cost_items.list_by_trip(trip).await?)
    }

    /// Look a cost item up by id.
    pub async fn get(&self, id: &CostItemId) -> Result<Option<CostItem>, Error> {
        Ok(self.cost_items.find_by_id(id).await?)
    }

    /// The item's share per current participant, recomputed on every call.
    pub async fn per_person_share(&self, item: &CostItem) -> Result<Decimal, Error> {
        let count = self.participants.count_by_trip(&item.trip_id).await?;
        Ok(per_person_share(item.total_amount, count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{
        MockCostItemRepository, MockParticipantRepository, MockTripRepository,
    };
    use crate::domain::{EventId, Identity, JoinCode, Role, Trip, TripDraft};
    use rstest::{fixture, rstest};

    type Service =
        CostItemService<MockCostItemRepository, MockTripRepository, MockParticipantRepository>;

    fn service(
        cost_items: MockCostItemRepository,
        trips: MockTripRepository,
        participants: MockParticipantRepository,
    ) -> Service {
        CostItemService::new(
            Arc::new(cost_items),
            Arc::new(trips),
            Arc::new(participants),
            AuthorizationPolicy::default(),
        )
    }

    #[fixture]
    fn organizer() -> Identity {
        Identity {
            user_id: UserId::random(),
            role: Role::Organizer,
        }
    }

    fn trip_of(organizer: UserId) -> Trip {
        TripDraft::try_new("Bus", EventId::random(), "Faro", "Lisbon", Utc::now())
            .expect("valid")
            .into_trip(organizer, JoinCode::generate(), Utc::now())
    }

    fn trips_with(trip: Trip) -> MockTripRepository {
        let mut trips = MockTripRepository::new();
        trips
            .expect_find_by_id()
            .return_once(move |_| Ok(Some(trip)));
        trips
    }

    fn fuel(trip: TripId, creator: UserId) -> CostItem {
        CostItemDraft::try_new(trip, "Fuel", Decimal::from(100))
            .expect("valid")
            .into_cost_item(creator, Utc::now())
    }

    #[rstest]
    #[tokio::test]
    async fn organizer_records_costs(organizer: Identity) {
        let trip = trip_of(organizer.user_id);
        let trip_id = trip.id;
        let mut items = MockCostItemRepository::new();
        items.expect_insert().times(1).return_once(|_| Ok(()));

        let item = service(items, trips_with(trip), MockParticipantRepository::new())
            .create(
                &Ok(organizer),
                CostItemDraft::try_new(trip_id, "Fuel", Decimal::from(100)).expect("valid"),
            )
            .await
            .expect("created");
        assert_eq!(item.creator_id, organizer.user_id);
        assert_eq!(item.trip_id, trip_id);
    }

    #[rstest]
    #[tokio::test]
    async fn members_cannot_record_costs(organizer: Identity) {
        let trip = trip_of(UserId::random());
        let trip_id = trip.id;
        let mut items = MockCostItemRepository::new();
        items.expect_insert().never();

        let err = service(items, trips_with(trip), MockParticipantRepository::new())
            .create(
                &Ok(organizer),
                CostItemDraft::try_new(trip_id, "Snacks", Decimal::from(5)).expect("valid"),
            )
            .await
            .expect_err("forbidden");
        assert_eq!(err.message(), "only the organizer can create cost items");
    }

    #[rstest]
    #[tokio::test]
    async fn costs_for_missing_trip_are_not_found(organizer: Identity) {
        let mut trips = MockTripRepository::new();
        trips.expect_find_by_id().return_once(|_| Ok(None));

        let err = service(MockCostItemRepository::new(), trips, MockParticipantRepository::new())
            .create(
                &Ok(organizer),
                CostItemDraft::try_new(TripId::random(), "Fuel", Decimal::ONE).expect("valid"),
            )
            .await
            .expect_err("missing trip");
        assert_eq!(err.message(), "trip not found");
    }

    #[rstest]
    #[case(true)]
    #[case(false)]
    #[tokio::test]
    async fn strangers_cannot_touch_items(organizer: Identity, #[case] deleting: bool) {
        let trip = trip_of(UserId::random());
        let item = fuel(trip.id, trip.organizer_id);
        let (id, trip_id) = (item.id, item.trip_id);
        let mut items = MockCostItemRepository::new();
        items.expect_find_by_id().return_once(move |_| Ok(Some(item)));
        items.expect_update().never();
        items.expect_delete().never();
        let service = service(items, trips_with(trip), MockParticipantRepository::new());

        let err = if deleting {
            service.delete(&Ok(organizer), &id).await.expect_err("forbidden")
        } else {
            let draft = CostItemDraft::try_new(trip_id, "Fuel", Decimal::ZERO).expect("valid");
            service
                .update(&Ok(organizer), &id, draft)
                .await
                .expect_err("forbidden")
        };
        let expected = if deleting {
            "only the organizer can delete cost items"
        } else {
            "only the organizer can edit cost items"
        };
        assert_eq!(err.message(), expected);
    }

    #[rstest]
    #[tokio::test]
    async fn update_changes_amount_in_place(organizer: Identity) {
        let trip = trip_of(organizer.user_id);
        let item = fuel(trip.id, organizer.user_id);
        let (id, trip_id) = (item.id, item.trip_id);
        let mut items = MockCostItemRepository::new();
        items.expect_find_by_id().return_once(move |_| Ok(Some(item)));
        items
            .expect_update()
            .withf(|item| item.total_amount == Decimal::from(120))
            .times(1)
            .return_once(|_| Ok(()));

        let updated = service(items, trips_with(trip), MockParticipantRepository::new())
            .update(
                &Ok(organizer),
                &id,
                CostItemDraft::try_new(TripId::random(), "Fuel", Decimal::from(120))
                    .expect("valid"),
            )
            .await
            .expect("updated");
        assert_eq!(updated.trip_id, trip_id);
    }

    #[rstest]
    #[case(4, Decimal::from(25))]
    #[case(0, Decimal::from(100))]
    #[tokio::test]
    async fn share_follows_current_head_count(#[case] count: i64, #[case] expected: Decimal) {
        let item = fuel(TripId::random(), UserId::random());
        let mut participants = MockParticipantRepository::new();
        participants
            .expect_count_by_trip()
            .times(1)
            .return_once(move |_| Ok(count));

        let share = service(
            MockCostItemRepository::new(),
            MockTripRepository::new(),
            participants,
        )
        .per_person_share(&item)
        .await
        .expect("share");
        assert_eq!(share, expected);
    }
}
