//! Port abstraction for trip membership persistence.
use async_trait::async_trait;

use crate::domain::{Participant, ParticipantId, TripId, UserId};

use super::RepositoryError;

/// Trip membership persistence.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ParticipantRepository: Send + Sync {
    /// Insert a membership, returning `Conflict` for a duplicate
    /// `(user, trip)` pair.
    async fn insert(&self, participant: &Participant) -> Result<(), RepositoryError>;

    async fn delete(&self, id: &ParticipantId) -> Result<bool, RepositoryError>;

    async fn find_by_id(&self, id: &ParticipantId) -> Result<Option<Participant>, RepositoryError>;

    async fn find_by_user_and_trip(
        &self,
        user: &UserId,
        trip: &TripId,
    ) -> Result<Option<Participant>, RepositoryError>;

    /// Members of a trip, earliest join first.
    async fn list_by_trip(&self, trip: &TripId) -> Result<Vec<Participant>, RepositoryError>;

    /// Memberships of a user, latest join first.
    async fn list_by_user(&self, user: &UserId) -> Result<Vec<Participant>, RepositoryError>;

    async fn count_by_trip(&self, trip: &TripId) -> Result<i64, RepositoryError>;
}
