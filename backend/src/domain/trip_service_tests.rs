//! Tests for the trip service.

use std::sync::Arc;

use super::*;
use crate::domain::ports::{
    MockCostItemRepository, MockEventRepository, MockParticipantRepository, MockTripRepository,
    RepositoryError,
};
use crate::domain::{
    Anonymous, CostItemDraft, ErrorCode, EventDraft, Identity, ORGANIZER_PUBLIC_INFO, Role,
};
use rstest::{fixture, rstest};

type Service = TripService<
    MockTripRepository,
    MockEventRepository,
    MockParticipantRepository,
    MockCostItemRepository,
>;

struct Mocks {
    trips: MockTripRepository,
    events: MockEventRepository,
    participants: MockParticipantRepository,
    cost_items: MockCostItemRepository,
}

impl Mocks {
    fn into_service(self) -> Service {
        TripService::new(
            Arc::new(self.trips),
            Arc::new(self.events),
            Arc::new(self.participants),
            Arc::new(self.cost_items),
            AuthorizationPolicy::default(),
        )
    }
}

#[fixture]
fn mocks() -> Mocks {
    Mocks {
        trips: MockTripRepository::new(),
        events: MockEventRepository::new(),
        participants: MockParticipantRepository::new(),
        cost_items: MockCostItemRepository::new(),
    }
}

#[fixture]
fn organizer() -> Identity {
    Identity {
        user_id: UserId::random(),
        role: Role::Organizer,
    }
}

fn draft(event: EventId) -> TripDraft {
    TripDraft::try_new("Coach to the fest", event, "Porto", "Lisbon", Utc::now())
        .expect("valid draft")
}

fn existing_trip(organizer: UserId) -> Trip {
    draft(EventId::random()).into_trip(organizer, JoinCode::generate(), Utc::now())
}

fn any_event() -> crate::domain::Event {
    EventDraft::try_new("Fest", None, "Lisbon", "Park", Utc::now(), None)
        .expect("valid")
        .into_event(Utc::now())
}

#[rstest]
#[tokio::test]
async fn create_enrols_organizer_atomically(mut mocks: Mocks, organizer: Identity) {
    mocks
        .events
        .expect_find_by_id()
        .return_once(|_| Ok(Some(any_event())));
    let expected = organizer.user_id;
    mocks
        .trips
        .expect_create_with_organizer()
        .withf(move |trip, participant| {
            trip.organizer_id == expected
                && participant.user_id == expected
                && participant.trip_id == trip.id
                && participant.profile_public_info.as_deref() == Some(ORGANIZER_PUBLIC_INFO)
        })
        .times(1)
        .return_once(|_, _| Ok(()));

    let trip = mocks
        .into_service()
        .create(&Ok(organizer), draft(EventId::random()))
        .await
        .expect("created");
    assert_eq!(trip.code.as_ref().len(), crate::domain::JOIN_CODE_LEN);
}

#[rstest]
#[tokio::test]
async fn create_requires_existing_event(mut mocks: Mocks, organizer: Identity) {
    mocks.events.expect_find_by_id().return_once(|_| Ok(None));
    mocks.trips.expect_create_with_organizer().never();

    let err = mocks
        .into_service()
        .create(&Ok(organizer), draft(EventId::random()))
        .await
        .expect_err("missing event");
    assert_eq!(err.code(), ErrorCode::NotFound);
    assert_eq!(err.message(), "event not found");
}

#[rstest]
#[case(constraint::TRIPS_CODE_KEY, ErrorCode::Conflict, "trip code already in use, please try again")]
#[case(constraint::TRIPS_EVENT_ID_FKEY, ErrorCode::NotFound, "event not found")]
#[case(constraint::TRIPS_ORGANIZER_ID_FKEY, ErrorCode::NotFound, "user not found")]
#[case(constraint::PARTICIPANTS_USER_ID_FKEY, ErrorCode::NotFound, "user not found")]
#[tokio::test]
async fn create_reports_the_violated_constraint(
    mut mocks: Mocks,
    organizer: Identity,
    #[case] violated: &'static str,
    #[case] code: ErrorCode,
    #[case] message: &str,
) {
    mocks
        .events
        .expect_find_by_id()
        .return_once(|_| Ok(Some(any_event())));
    mocks
        .trips
        .expect_create_with_organizer()
        .return_once(move |_, _| Err(RepositoryError::conflict(violated)));

    let err = mocks
        .into_service()
        .create(&Ok(organizer), draft(EventId::random()))
        .await
        .expect_err("insert rejected");
    assert_eq!(err.code(), code);
    assert_eq!(err.message(), message);
}

#[rstest]
#[tokio::test]
async fn create_requires_login(mocks: Mocks) {
    let err = mocks
        .into_service()
        .create(&Err(Anonymous::MissingToken), draft(EventId::random()))
        .await
        .expect_err("anonymous");
    assert_eq!(err.code(), ErrorCode::Unauthorized);
}

#[rstest]
#[tokio::test]
async fn update_keeps_the_code(mut mocks: Mocks, organizer: Identity) {
    let trip = existing_trip(organizer.user_id);
    let (id, code, event_id) = (trip.id, trip.code.clone(), trip.event_id);
    mocks
        .trips
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(trip)));
    mocks.trips.expect_update().times(1).return_once(|_| Ok(()));

    let updated = mocks
        .into_service()
        .update(&Ok(organizer), &id, draft(event_id))
        .await
        .expect("updated");
    assert_eq!(updated.code, code);
}

#[rstest]
#[case(true)]
#[case(false)]
#[tokio::test]
async fn strangers_cannot_change_a_trip(
    mut mocks: Mocks,
    organizer: Identity,
    #[case] deleting: bool,
) {
    let trip = existing_trip(UserId::random());
    let id = trip.id;
    let event_id = trip.event_id;
    mocks
        .trips
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(trip)));
    mocks.trips.expect_update().never();
    mocks.trips.expect_delete_cascade().never();
    let service = mocks.into_service();

    let err = if deleting {
        service.delete(&Ok(organizer), &id).await.expect_err("forbidden")
    } else {
        service
            .update(&Ok(organizer), &id, draft(event_id))
            .await
            .expect_err("forbidden")
    };
    assert_eq!(err.code(), ErrorCode::Forbidden);
    let expected = if deleting {
        "only the organizer can delete the trip"
    } else {
        "only the organizer can edit the trip"
    };
    assert_eq!(err.message(), expected);
}

#[rstest]
#[tokio::test]
async fn organizer_deletes_with_cascade(mut mocks: Mocks, organizer: Identity) {
    let trip = existing_trip(organizer.user_id);
    let id = trip.id;
    mocks
        .trips
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(trip)));
    mocks
        .trips
        .expect_delete_cascade()
        .times(1)
        .return_once(|_| Ok(true));

    assert!(
        mocks
            .into_service()
            .delete(&Ok(organizer), &id)
            .await
            .expect("deleted")
    );
}

#[rstest]
#[tokio::test]
async fn malformed_codes_find_nothing(mut mocks: Mocks) {
    mocks.trips.expect_find_by_code().never();
    let found = mocks
        .into_service()
        .by_code("not a code!")
        .await
        .expect("lookup succeeds");
    assert!(found.is_none());
}

#[rstest]
#[tokio::test]
async fn totals_are_read_at_call_time(mut mocks: Mocks, organizer: Identity) {
    let trip = TripId::random();
    mocks
        .participants
        .expect_count_by_trip()
        .return_once(|_| Ok(2));
    mocks.cost_items.expect_list_by_trip().return_once(move |_| {
        Ok(vec![
            CostItemDraft::try_new(trip, "Fuel", Decimal::from(60))
                .expect("valid")
                .into_cost_item(organizer.user_id, Utc::now()),
            CostItemDraft::try_new(trip, "Tolls", Decimal::new(4050, 2))
                .expect("valid")
                .into_cost_item(organizer.user_id, Utc::now()),
        ])
    });

    let service = mocks.into_service();
    assert_eq!(service.participant_count(&trip).await.expect("count"), 2);
    assert_eq!(
        service.total_costs(&trip).await.expect("total"),
        Decimal::new(10050, 2)
    );
}

#[rstest]
#[tokio::test]
async fn overflowing_totals_fail_instead_of_panicking(mut mocks: Mocks, organizer: Identity) {
    let trip = TripId::random();
    mocks.cost_items.expect_list_by_trip().return_once(move |_| {
        let huge = |label: &str| {
            let mut item = CostItemDraft::try_new(trip, label, Decimal::ZERO)
                .expect("valid")
                .into_cost_item(organizer.user_id, Utc::now());
            item.total_amount = Decimal::MAX;
            item
        };
        Ok(vec![huge("Charter"), huge("Catering")])
    });

    let err = mocks
        .into_service()
        .total_costs(&trip)
        .await
        .expect_err("sum out of range");
    assert_eq!(err.code(), ErrorCode::InternalError);
}

#[rstest]
#[tokio::test]
async fn mine_is_empty_when_anonymous(mut mocks: Mocks) {
    mocks.trips.expect_list_by_organizer().never();
    let trips = mocks
        .into_service()
        .mine(&Err(Anonymous::InvalidToken))
        .await
        .expect("listed");
    assert!(trips.is_empty());
}
