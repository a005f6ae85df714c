//! Tests for joining and leaving trips.

use std::sync::Arc;

use super::*;
use crate::domain::ports::{MockParticipantRepository, MockTripRepository, RepositoryError};
use crate::domain::{ErrorCode, EventId, Identity, Role, Trip, TripDraft};
use rstest::{fixture, rstest};

type Service = ParticipantService<MockParticipantRepository, MockTripRepository>;

fn service(participants: MockParticipantRepository, trips: MockTripRepository) -> Service {
    ParticipantService::new(
        Arc::new(participants),
        Arc::new(trips),
        AuthorizationPolicy::default(),
    )
}

fn identity() -> Identity {
    Identity {
        user_id: UserId::random(),
        role: Role::User,
    }
}

#[fixture]
fn trip() -> Trip {
    TripDraft::try_new("Van", EventId::random(), "Braga", "Porto", Utc::now())
        .expect("valid")
        .into_trip(
            UserId::random(),
            JoinCode::parse("ABCD1234").expect("valid code"),
            Utc::now(),
        )
}

fn trips_returning(trip: &Trip) -> MockTripRepository {
    let mut trips = MockTripRepository::new();
    let by_code = trip.clone();
    trips
        .expect_find_by_code()
        .returning(move |code| Ok((code == &by_code.code).then(|| by_code.clone())));
    let by_id = trip.clone();
    trips
        .expect_find_by_id()
        .returning(move |id| Ok((id == &by_id.id).then(|| by_id.clone())));
    trips
}

#[rstest]
#[case(Some("abcd1234"))]
#[case(Some(" ABCD1234 "))]
#[case(Some(""))]
#[case(Some("   "))]
#[case(None)]
#[tokio::test]
async fn join_succeeds_with_matching_or_blank_code(trip: Trip, #[case] code: Option<&str>) {
    let mut participants = MockParticipantRepository::new();
    participants
        .expect_find_by_user_and_trip()
        .return_once(|_, _| Ok(None));
    participants.expect_insert().times(1).return_once(|_| Ok(()));
    let caller = identity();

    let joined = service(participants, trips_returning(&trip))
        .join(&Ok(caller), &trip.id, code)
        .await
        .expect("joined");
    assert_eq!(joined.user_id, caller.user_id);
    assert_eq!(joined.trip_id, trip.id);
}

#[rstest]
#[case("ZZZZ9999")]
#[case("bad code")]
#[tokio::test]
async fn join_with_wrong_code_creates_nothing(trip: Trip, #[case] code: &str) {
    let mut participants = MockParticipantRepository::new();
    participants.expect_insert().never();

    let err = service(participants, trips_returning(&trip))
        .join(&Ok(identity()), &trip.id, Some(code))
        .await
        .expect_err("invalid code");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert_eq!(err.message(), INVALID_CODE);
}

#[rstest]
#[tokio::test]
async fn code_of_another_trip_is_invalid(trip: Trip) {
    let mut participants = MockParticipantRepository::new();
    participants.expect_insert().never();

    let err = service(participants, trips_returning(&trip))
        .join(&Ok(identity()), &TripId::random(), Some("ABCD1234"))
        .await
        .expect_err("code for another trip");
    assert_eq!(err.message(), INVALID_CODE);
}

#[rstest]
#[tokio::test]
async fn join_unknown_trip_is_not_found(trip: Trip) {
    let err = service(MockParticipantRepository::new(), trips_returning(&trip))
        .join(&Ok(identity()), &TripId::random(), None)
        .await
        .expect_err("missing trip");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn duplicate_join_is_conflict(trip: Trip) {
    let caller = identity();
    let existing = Participant::new(caller.user_id, trip.id, Utc::now());
    let mut participants = MockParticipantRepository::new();
    participants
        .expect_find_by_user_and_trip()
        .return_once(move |_, _| Ok(Some(existing)));
    participants.expect_insert().never();

    let err = service(participants, trips_returning(&trip))
        .join(&Ok(caller), &trip.id, Some(trip.code.as_ref()))
        .await
        .expect_err("duplicate");
    assert_eq!(err.code(), ErrorCode::Conflict);
    assert_eq!(err.message(), ALREADY_JOINED);
}

#[rstest]
#[tokio::test]
async fn lost_insert_race_is_the_same_conflict(trip: Trip) {
    let mut participants = MockParticipantRepository::new();
    participants
        .expect_find_by_user_and_trip()
        .return_once(|_, _| Ok(None));
    participants
        .expect_insert()
        .return_once(|_| Err(RepositoryError::conflict(
            constraint::PARTICIPANTS_USER_ID_TRIP_ID_KEY,
        )));

    let err = service(participants, trips_returning(&trip))
        .join(&Ok(identity()), &trip.id, None)
        .await
        .expect_err("race lost");
    assert_eq!(err.message(), ALREADY_JOINED);
}

#[rstest]
#[case(constraint::PARTICIPANTS_USER_ID_FKEY, ErrorCode::NotFound, "user not found")]
#[case(constraint::PARTICIPANTS_TRIP_ID_FKEY, ErrorCode::NotFound, "trip not found")]
#[case("participants_other_check", ErrorCode::Conflict, "participants_other_check")]
#[tokio::test]
async fn reference_violations_are_not_duplicates(
    trip: Trip,
    #[case] violated: &'static str,
    #[case] code: ErrorCode,
    #[case] message: &str,
) {
    let mut participants = MockParticipantRepository::new();
    participants
        .expect_find_by_user_and_trip()
        .return_once(|_, _| Ok(None));
    participants
        .expect_insert()
        .return_once(move |_| Err(RepositoryError::conflict(violated)));

    let err = service(participants, trips_returning(&trip))
        .join(&Ok(identity()), &trip.id, Some(trip.code.as_ref()))
        .await
        .expect_err("insert rejected");
    assert_eq!(err.code(), code);
    assert_eq!(err.message(), message);
}

#[rstest]
#[case(true)]
#[case(false)]
#[tokio::test]
async fn organizer_membership_is_never_removed(trip: Trip, #[case] organizer_asks: bool) {
    let membership = Participant::organizer(trip.organizer_id, trip.id, Utc::now());
    let membership_id = membership.id;
    let mut participants = MockParticipantRepository::new();
    participants
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(membership)));
    participants.expect_delete().never();
    let caller = if organizer_asks {
        Identity {
            user_id: trip.organizer_id,
            role: Role::Organizer,
        }
    } else {
        identity()
    };

    let err = service(participants, trips_returning(&trip))
        .leave(&Ok(caller), &membership_id)
        .await
        .expect_err("organizer stays");
    let expected = if organizer_asks {
        ErrorCode::InvalidRequest
    } else {
        ErrorCode::Forbidden
    };
    assert_eq!(err.code(), expected);
}

#[rstest]
#[case(true)]
#[case(false)]
#[tokio::test]
async fn member_or_organizer_may_remove_a_membership(trip: Trip, #[case] member_asks: bool) {
    let member = identity();
    let membership = Participant::new(member.user_id, trip.id, Utc::now());
    let membership_id = membership.id;
    let mut participants = MockParticipantRepository::new();
    participants
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(membership)));
    participants
        .expect_delete()
        .times(1)
        .return_once(|_| Ok(true));
    let caller = if member_asks {
        member
    } else {
        Identity {
            user_id: trip.organizer_id,
            role: Role::Organizer,
        }
    };

    let removed = service(participants, trips_returning(&trip))
        .leave(&Ok(caller), &membership_id)
        .await
        .expect("removed");
    assert!(removed);
}

#[rstest]
#[tokio::test]
async fn strangers_cannot_remove_members(trip: Trip) {
    let membership = Participant::new(UserId::random(), trip.id, Utc::now());
    let membership_id = membership.id;
    let mut participants = MockParticipantRepository::new();
    participants
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(membership)));
    participants.expect_delete().never();

    let err = service(participants, trips_returning(&trip))
        .leave(&Ok(identity()), &membership_id)
        .await
        .expect_err("forbidden");
    assert_eq!(err.message(), "not allowed to remove this participation");
}

#[rstest]
#[tokio::test]
async fn missing_membership_is_not_found() {
    let mut participants = MockParticipantRepository::new();
    participants.expect_find_by_id().return_once(|_| Ok(None));

    let err = service(participants, MockTripRepository::new())
        .leave(&Ok(identity()), &ParticipantId::random())
        .await
        .expect_err("missing");
    assert_eq!(err.message(), "participation not found");
}
