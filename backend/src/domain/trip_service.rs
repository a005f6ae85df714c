//! Trip use-cases: creation with organizer enrolment, cascade deletion and
//! read-time summaries.

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::domain::ports::{
    CostItemRepository, EventRepository, ParticipantRepository, TripRepository, constraint,
};
use crate::domain::{
    Action, AuthorizationPolicy, CallerIdentity, Error, EventId, JoinCode, Page, Participant,
    Resource, Trip, TripDraft, TripId, TripsFilter, UserId, require_identity,
    trip_total,
};

/// Trip orchestration over trips, events, participants and cost items.
pub struct TripService<T: ?Sized, E: ?Sized, P: ?Sized, C: ?Sized> {
    trips: Arc<T>,
    events: Arc<E>,
    participants: Arc<P>,
    cost_items: Arc<C>,
    policy: AuthorizationPolicy,
}

impl<T: ?Sized, E: ?Sized, P: ?Sized, C: ?Sized> Clone for TripService<T, E, P, C> {
    fn clone(&self) -> Self {
        Self {
            trips: Arc::clone(&self.trips),
            events: Arc::clone(&self.events),
            participants: Arc::clone(&self.participants),
            cost_items: Arc::clone(&self.cost_items),
            policy: self.policy,
        }
    }
}

impl<T, E, P, C> TripService<T, E, P, C>
where
    T: TripRepository + ?Sized,
    E: EventRepository + ?Sized,
    P: ParticipantRepository + ?Sized,
    C: CostItemRepository + ?Sized,
{
    /// Create a new service with the given repositories.
    pub fn new(
        trips: Arc<T>,
        events: Arc<E>,
        participants: Arc<P>,
        cost_items: Arc<C>,
        policy: AuthorizationPolicy,
    ) -> Self {
        Self {
            trips,
            events,
            participants,
            cost_items,
            policy,
        }
    }

    async fn load(&self, id: &TripId) -> Result<Trip, Error> {
        self.trips
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::not_found("trip not found"))
    }

    async fn ensure_event(&self, id: &EventId) -> Result<(), Error> {
        match self.events.find_by_id(id).await? {
            Some(_) => Ok(()),
            None => Err(Error::not_found("event not found")),
        }
    }

    /// Create a trip and enrol the caller as its organizer in one unit.
    ///
    /// The join code is generated once and never regenerated. A code
    /// collision surfaces as a conflict; there is no retry.
    pub async fn create(&self, caller: &CallerIdentity, draft: TripDraft) -> Result<Trip, Error> {
        let identity = require_identity(caller)?;
        self.ensure_event(&draft.event_id).await?;

        let now = Utc::now();
        let trip = draft.into_trip(identity.user_id, JoinCode::generate(), now);
        let organizer = Participant::organizer(identity.user_id, trip.id, now);
        self.trips
            .create_with_organizer(&trip, &organizer)
            .await
            .map_err(|err| match err {
                err if err.violates(constraint::TRIPS_CODE_KEY) => {
                    warn!(code = %trip.code, "join code collision");
                    Error::conflict("trip code already in use, please try again")
                }
                err if err.violates(constraint::TRIPS_EVENT_ID_FKEY) => {
                    Error::not_found("event not found")
                }
                err if err.violates(constraint::TRIPS_ORGANIZER_ID_FKEY)
                    || err.violates(constraint::PARTICIPANTS_USER_ID_FKEY) =>
                {
                    Error::not_found("user not found")
                }
                other => other.into(),
            })?;
        info!(trip_id = %trip.id, user_id = %identity.user_id, code = %trip.code, "trip created");
        Ok(trip)
    }

    /// Update a trip the caller organizes; the join code is kept.
    pub async fn update(
        &self,
        caller: &CallerIdentity,
        id: &TripId,
        draft: TripDraft,
    ) -> Result<Trip, Error> {
        let identity = require_identity(caller)?;
        let mut trip = self.load(id).await?;
        self.policy
            .authorize(
                &identity,
                Resource::Trip {
                    organizer: trip.organizer_id,
                },
                Action::Update,
            )
            .into_result()?;
        if draft.event_id != trip.event_id {
            self.ensure_event(&draft.event_id).await?;
        }

        draft.apply_to(&mut trip);
        self.trips.update(&trip).await?;
        info!(trip_id = %trip.id, "trip updated");
        Ok(trip)
    }

    /// Delete a trip with its participants and cost items. Vehicle offers
    /// pointing at it are detached, not deleted.
    pub async fn delete(&self, caller: &CallerIdentity, id: &TripId) -> Result<bool, Error> {
        let identity = require_identity(caller)?;
        let trip = self.load(id).await?;
        self.policy
            .authorize(
                &identity,
                Resource::Trip {
                    organizer: trip.organizer_id,
                },
                Action::Delete,
            )
            .into_result()?;

        let removed = self.trips.delete_cascade(id).await?;
        info!(trip_id = %id, removed, "trip deleted");
        Ok(removed)
    }

    /// Filtered trips ordered by date ascending.
    pub async fn list(&self, filter: TripsFilter, page: Page) -> Result<Vec<Trip>, Error> {
        Ok(self.trips.list(&filter.normalised(), page).await?)
    }

    /// Look a trip up by id.
    pub async fn get(&self, id: &TripId) -> Result<Option<Trip>, Error> {
        Ok(self.trips.find_by_id(id).await?)
    }

    /// Look a trip up by join code. Malformed codes simply match nothing.
    pub async fn by_code(&self, raw: &str) -> Result<Option<Trip>, Error> {
        let Ok(code) = JoinCode::parse(raw) else {
            return Ok(None);
        };
        Ok(self.trips.find_by_code(&code).await?)
    }

    /// Trips organised by the caller, newest first; empty when anonymous.
    pub async fn mine(&self, caller: &CallerIdentity) -> Result<Vec<Trip>, Error> {
        match caller {
            Ok(identity) => self.for_organizer(&identity.user_id).await,
            Err(_) => Ok(Vec::new()),
        }
    }

    /// Trips organised by one user, newest first.
    pub async fn for_organizer(&self, organizer: &UserId) -> Result<Vec<Trip>, Error> {
        Ok(self.trips.list_by_organizer(organizer).await?)
    }

    /// Trips heading to one event.
    pub async fn for_event(&self, event: &EventId) -> Result<Vec<Trip>, Error> {
        Ok(self.trips.list_by_event(event).await?)
    }

    /// Current head count of a trip.
    pub async fn participant_count(&self, trip: &TripId) -> Result<i64, Error> {
        Ok(self.participants.count_by_trip(trip).await?)
    }

    /// Sum of all cost items of a trip, computed at read time.
    pub async fn total_costs(&self, trip: &TripId) -> Result<Decimal, Error> {
        let items = self.cost_items.list_by_trip(trip).await?;
        trip_total(&items).ok_or_else(|| {
            warn!(trip_id = %trip, items = items.len(), "cost total overflowed");
            Error::internal("cost total is out of range")
        })
    }
}

#[cfg(test)]
#[path = "trip_service_tests.rs"]
mod tests;
