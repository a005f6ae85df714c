//! Port abstraction for trip persistence.
//!
//! Trip creation and deletion touch several tables; adapters must run
//! [`TripRepository::create_with_organizer`] and
//! [`TripRepository::delete_cascade`] as single atomic units.
use async_trait::async_trait;

use crate::domain::{EventId, JoinCode, Page, Participant, Trip, TripId, TripsFilter, UserId};

use super::RepositoryError;

/// Trip persistence.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TripRepository: Send + Sync {
    /// Insert a trip together with its organizer membership.
    ///
    /// Returns `Conflict` when the join code is already taken.
    async fn create_with_organizer(
        &self,
        trip: &Trip,
        organizer: &Participant,
    ) -> Result<(), RepositoryError>;

    /// Overwrite the editable columns of a trip. The join code is not written.
    async fn update(&self, trip: &Trip) -> Result<(), RepositoryError>;

    /// Remove participants and cost items, detach vehicle offers, then delete
    /// the trip. Returns `false` when the trip did not exist.
    async fn delete_cascade(&self, id: &TripId) -> Result<bool, RepositoryError>;

    async fn find_by_id(&self, id: &TripId) -> Result<Option<Trip>, RepositoryError>;

    async fn find_by_code(&self, code: &JoinCode) -> Result<Option<Trip>, RepositoryError>;

    /// Filtered page of trips ordered by date ascending.
    async fn list(&self, filter: &TripsFilter, page: Page) -> Result<Vec<Trip>, RepositoryError>;

    /// Trips organised by `organizer`, newest first.
    async fn list_by_organizer(&self, organizer: &UserId) -> Result<Vec<Trip>, RepositoryError>;

    /// Trips to an event, ordered by date ascending.
    async fn list_by_event(&self, event: &EventId) -> Result<Vec<Trip>, RepositoryError>;
}
