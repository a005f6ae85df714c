//! Trip membership records.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{ParticipantId, TripId, UserId};

/// Public info attached to the organizer's automatic membership.
pub const ORGANIZER_PUBLIC_INFO: &str = "Trip organizer";

/// Links one user to one trip. The `(user_id, trip_id)` pair is unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub id: ParticipantId,
    pub user_id: UserId,
    pub trip_id: TripId,
    pub joined_at: DateTime<Utc>,
    pub profile_public_info: Option<String>,
}

impl Participant {
    /// New membership for `user_id` in `trip_id`, joined at `now`.
    pub fn new(user_id: UserId, trip_id: TripId, now: DateTime<Utc>) -> Self {
        Self {
            id: ParticipantId::random(),
            user_id,
            trip_id,
            joined_at: now,
            profile_public_info: None,
        }
    }

    /// Organizer membership created alongside a trip.
    pub fn organizer(user_id: UserId, trip_id: TripId, now: DateTime<Utc>) -> Self {
        Self {
            profile_public_info: Some(ORGANIZER_PUBLIC_INFO.to_owned()),
            ..Self::new(user_id, trip_id, now)
        }
    }
}
