//! Constraint and cascade behaviour of the in-memory store.

use chrono::{Duration, Utc};
use rstest::{fixture, rstest};
use rust_decimal::Decimal;

use super::*;
use crate::domain::{
    CompanyDraft, CostItemDraft, EventDraft, NewUser, Role, TripDraft, VehicleOfferDraft,
    VehicleOfferInput,
};

fn user(email: &str) -> User {
    NewUser {
        name: "Ana".to_owned(),
        email: EmailAddress::new(email).expect("valid email"),
        password_hash: "hash".to_owned(),
        role: Role::User,
    }
    .into_user(Utc::now())
}

struct Seeded {
    store: MemoryStore,
    organizer: User,
    company: Company,
    event: Event,
    trip: Trip,
}

#[fixture]
async fn seeded() -> Seeded {
    let store = MemoryStore::new();
    let organizer = user("organizer@example.com");
    UserRepository::insert(&store, &organizer).await.expect("user");
    let company = CompanyDraft::try_new("Coaches", None, "desk@coaches.test")
        .expect("valid")
        .into_company(organizer.id, Utc::now());
    CompanyRepository::insert(&store, &company).await.expect("company");
    let event = EventDraft::try_new("Fest", None, "Lisbon", "Park", Utc::now(), Some(company.id))
        .expect("valid")
        .into_event(Utc::now());
    EventRepository::insert(&store, &event).await.expect("event");
    let trip = TripDraft::try_new("Van", event.id, "Porto", "Lisbon", Utc::now())
        .expect("valid")
        .into_trip(organizer.id, JoinCode::generate(), Utc::now());
    store
        .create_with_organizer(&trip, &Participant::organizer(organizer.id, trip.id, Utc::now()))
        .await
        .expect("trip");
    Seeded {
        store,
        organizer,
        company,
        event,
        trip,
    }
}

fn offer_for(company: CompanyId, trip: Option<TripId>) -> VehicleOffer {
    VehicleOfferDraft::try_new(VehicleOfferInput {
        capacity: 8,
        pickup_location: "Station",
        trip_id: trip,
        ..VehicleOfferInput::default()
    })
    .expect("valid")
    .into_offer(company, Utc::now())
}

#[tokio::test]
async fn duplicate_emails_conflict() {
    let store = MemoryStore::new();
    UserRepository::insert(&store, &user("a@example.com"))
        .await
        .expect("first");
    let err = UserRepository::insert(&store, &user("a@example.com"))
        .await
        .expect_err("duplicate");
    assert!(matches!(err, RepositoryError::Conflict { .. }));
}

#[rstest]
#[tokio::test]
async fn a_user_joins_a_trip_once(#[future] seeded: Seeded) {
    let s = seeded.await;
    let rider = user("rider@example.com");
    UserRepository::insert(&s.store, &rider).await.expect("user");

    ParticipantRepository::insert(&s.store, &Participant::new(rider.id, s.trip.id, Utc::now()))
        .await
        .expect("joined");
    let err =
        ParticipantRepository::insert(&s.store, &Participant::new(rider.id, s.trip.id, Utc::now()))
            .await
            .expect_err("second join");

    assert_eq!(
        err,
        RepositoryError::conflict("participants_user_id_trip_id_key")
    );
    assert_eq!(s.store.count_by_trip(&s.trip.id).await.expect("count"), 2);
}

#[rstest]
#[tokio::test]
async fn participants_need_existing_users(#[future] seeded: Seeded) {
    let s = seeded.await;
    let ghost = Participant::new(UserId::random(), s.trip.id, Utc::now());
    let err = ParticipantRepository::insert(&s.store, &ghost)
        .await
        .expect_err("unknown user");
    assert!(matches!(err, RepositoryError::Conflict { .. }));
}

#[rstest]
#[tokio::test]
async fn join_codes_are_unique(#[future] seeded: Seeded) {
    let s = seeded.await;
    let clash = Trip {
        id: TripId::random(),
        ..s.trip.clone()
    };
    let err = s
        .store
        .create_with_organizer(
            &clash,
            &Participant::organizer(s.organizer.id, clash.id, Utc::now()),
        )
        .await
        .expect_err("code taken");
    assert_eq!(err, RepositoryError::conflict("trips_code_key"));
    assert!(TripRepository::find_by_id(&s.store, &clash.id)
        .await
        .expect("lookup")
        .is_none());
}

#[rstest]
#[tokio::test]
async fn deleting_a_trip_cascades_and_detaches_offers(#[future] seeded: Seeded) {
    let s = seeded.await;
    let item = CostItemDraft::try_new(s.trip.id, "Fuel", Decimal::new(120, 0))
        .expect("valid")
        .into_cost_item(s.organizer.id, Utc::now());
    CostItemRepository::insert(&s.store, &item).await.expect("item");
    let offer = offer_for(s.company.id, Some(s.trip.id));
    VehicleOfferRepository::insert(&s.store, &offer)
        .await
        .expect("offer");

    assert!(s.store.delete_cascade(&s.trip.id).await.expect("deleted"));

    assert_eq!(s.store.count_by_trip(&s.trip.id).await.expect("count"), 0);
    assert!(
        CostItemRepository::list_by_trip(&s.store, &s.trip.id)
            .await
            .expect("items")
            .is_empty()
    );
    let detached = VehicleOfferRepository::find_by_id(&s.store, &offer.id)
        .await
        .expect("lookup")
        .expect("offer survives");
    assert_eq!(detached.trip_id, None);
    assert!(!s.store.delete_cascade(&s.trip.id).await.expect("second"));
}

#[rstest]
#[tokio::test]
async fn referenced_rows_cannot_be_deleted(#[future] seeded: Seeded) {
    let s = seeded.await;
    let event_err = EventRepository::delete(&s.store, &s.event.id)
        .await
        .expect_err("event has trips");
    assert_eq!(event_err, RepositoryError::conflict("trips_event_id_fkey"));

    let company_err = CompanyRepository::delete(&s.store, &s.company.id)
        .await
        .expect_err("company organises events");
    assert!(matches!(company_err, RepositoryError::Conflict { .. }));
}

#[rstest]
#[tokio::test]
async fn updates_of_missing_rows_are_not_found(#[future] seeded: Seeded) {
    let s = seeded.await;
    let phantom = Trip {
        id: TripId::random(),
        ..s.trip.clone()
    };
    let err = TripRepository::update(&s.store, &phantom)
        .await
        .expect_err("missing");
    assert!(matches!(err, RepositoryError::NotFound { .. }));
}

#[rstest]
#[tokio::test]
async fn listings_page_in_date_order(#[future] seeded: Seeded) {
    let s = seeded.await;
    let later = EventDraft::try_new(
        "Late show",
        None,
        "Lisbon",
        "Hall",
        Utc::now() + Duration::days(3),
        None,
    )
    .expect("valid")
    .into_event(Utc::now());
    EventRepository::insert(&s.store, &later).await.expect("event");

    let all = EventRepository::list(&s.store, &EventsFilter::default(), Page::default())
        .await
        .expect("list");
    let titles: Vec<_> = all.iter().map(|e| e.title.as_str()).collect();
    assert_eq!(titles, ["Fest", "Late show"]);

    let second = EventRepository::list(
        &s.store,
        &EventsFilter::default(),
        Page::new(Some(1), Some(1)).expect("page"),
    )
    .await
    .expect("list");
    assert_eq!(second.len(), 1);
    assert_eq!(second.first().map(|e| e.id), Some(later.id));
}

#[tokio::test]
async fn reports_memory_backend() {
    let store = MemoryStore::new();
    store.ping().await.expect("healthy");
    assert_eq!(store.backend(), "memory");
}
