//! Joining and leaving trips.
//!
//! Membership moves between two states: not a participant and participant.
//! `join` requires no existing row for the `(user, trip)` pair; `leave`
//! refuses to remove the organizer's own membership no matter who asks.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use crate::domain::ports::{ParticipantRepository, TripRepository, constraint};
use crate::domain::{
    Action, AuthorizationPolicy, CallerIdentity, Error, JoinCode, Participant, ParticipantId,
    Resource, TripId, UserId, require_identity,
};

const INVALID_CODE: &str = "invalid trip code";
const ALREADY_JOINED: &str = "user already participates in this trip";

/// Trip membership use-cases.
pub struct ParticipantService<P: ?Sized, T: ?Sized> {
    participants: Arc<P>,
    trips: Arc<T>,
    policy: AuthorizationPolicy,
}

impl<P: ?Sized, T: ?Sized> Clone for ParticipantService<P, T> {
    fn clone(&self) -> Self {
        Self {
            participants: Arc::clone(&self.participants),
            trips: Arc::clone(&self.trips),
            policy: self.policy,
        }
    }
}

impl<P, T> ParticipantService<P, T>
where
    P: ParticipantRepository + ?Sized,
    T: TripRepository + ?Sized,
{
    /// Create a new service with the given repositories.
    pub fn new(participants: Arc<P>, trips: Arc<T>, policy: AuthorizationPolicy) -> Self {
        Self {
            participants,
            trips,
            policy,
        }
    }

    /// Check that `raw` is the join code of `trip_id`.
    async fn verify_code(&self, trip_id: &TripId, raw: &str) -> Result<(), Error> {
        let code = JoinCode::parse(raw).map_err(|_| Error::invalid_request(INVALID_CODE))?;
        match self.trips.find_by_code(&code).await? {
            Some(trip) if trip.id == *trip_id => Ok(()),
            _ => {
                debug!(trip_id = %trip_id, "join code does not match trip");
                Err(Error::invalid_request(INVALID_CODE))
            }
        }
    }

    /// Join a trip, optionally proving knowledge of its code. A blank code
    /// counts as no code.
    ///
    /// A lost race against a concurrent identical join surfaces as the same
    /// conflict as the pre-check.
    pub async fn join(
        &self,
        caller: &CallerIdentity,
        trip_id: &TripId,
        code: Option<&str>,
    ) -> Result<Participant, Error> {
        let identity = require_identity(caller)?;
        if let Some(raw) = code.filter(|raw| !raw.trim().is_empty()) {
            self.verify_code(trip_id, raw).await?;
        }
        if self.trips.find_by_id(trip_id).await?.is_none() {
            return Err(Error::not_found("trip not found"));
        }
        if self
            .participants
            .find_by_user_and_trip(&identity.user_id, trip_id)
            .await?
            .is_some()
        {
            return Err(Error::conflict(ALREADY_JOINED));
        }

        let participant = Participant::new(identity.user_id, *trip_id, Utc::now());
        self.participants
            .insert(&participant)
            .await
            .map_err(|err| match err {
                err if err.violates(constraint::PARTICIPANTS_USER_ID_TRIP_ID_KEY) => {
                    Error::conflict(ALREADY_JOINED)
                }
                err if err.violates(constraint::PARTICIPANTS_TRIP_ID_FKEY) => {
                    Error::not_found("trip not found")
                }
                err if err.violates(constraint::PARTICIPANTS_USER_ID_FKEY) => {
                    Error::not_found("user not found")
                }
                other => other.into(),
            })?;
        info!(trip_id = %trip_id, user_id = %identity.user_id, "participant joined");
        Ok(participant)
    }

    /// Remove a membership. Allowed for the member and the trip organizer,
    /// never for the organizer's own membership.
    pub async fn leave(
        &self,
        caller: &CallerIdentity,
        participant_id: &ParticipantId,
    ) -> Result<bool, Error> {
        let identity = require_identity(caller)?;
        let participant = self
            .participants
            .find_by_id(participant_id)
            .await?
            .ok_or_else(|| Error::not_found("participation not found"))?;
        let trip = self
            .trips
            .find_by_id(&participant.trip_id)
            .await?
            .ok_or_else(|| Error::not_found("trip not found"))?;

        self.policy
            .authorize(
                &identity,
                Resource::Participant {
                    member: participant.user_id,
                    trip_organizer: trip.organizer_id,
                },
                Action::Remove,
            )
            .into_result()?;
        if participant.user_id == trip.organizer_id {
            return Err(Error::invalid_request(
                "the organizer cannot leave their own trip",
            ));
        }

        let removed = self.participants.delete(participant_id).await?;
        info!(
            trip_id = %trip.id,
            user_id = %participant.user_id,
            removed_by = %identity.user_id,
            "participant left"
        );
        Ok(removed)
    }

    /// The caller's memberships, latest first; empty when anonymous.
    pub async fn mine(&self, caller: &CallerIdentity) -> Result<Vec<Participant>, Error> {
        match caller {
            Ok(identity) => self.for_user(&identity.user_id).await,
            Err(_) => Ok(Vec::new()),
        }
    }

    /// Memberships of one user, latest first.
    pub async fn for_user(&self, user: &UserId) -> Result<Vec<Participant>, Error> {
        Ok(self.participants.list_by_user(user).await?)
    }

    /// Members of a trip, earliest join first.
    pub async fn for_trip(&self, trip: &TripId) -> Result<Vec<Participant>, Error> {
        Ok(self.participants.list_by_trip(trip).await?)
    }
}

#[cfg(test)]
#[path = "participant_service_tests.rs"]
mod tests;
