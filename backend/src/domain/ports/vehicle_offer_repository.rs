//! Port abstraction for vehicle offer persistence.
use async_trait::async_trait;

use crate::domain::{CompanyId, TripId, VehicleOffer, VehicleOfferId};

use super::RepositoryError;

/// Vehicle offer persistence.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VehicleOfferRepository: Send + Sync {
    async fn insert(&self, offer: &VehicleOffer) -> Result<(), RepositoryError>;

    async fn update(&self, offer: &VehicleOffer) -> Result<(), RepositoryError>;

    async fn delete(&self, id: &VehicleOfferId) -> Result<bool, RepositoryError>;

    async fn find_by_id(&self, id: &VehicleOfferId)
    -> Result<Option<VehicleOffer>, RepositoryError>;

    /// Offers attached to `trip`, or every offer when `trip` is `None`;
    /// newest first.
    async fn list(&self, trip: Option<TripId>) -> Result<Vec<VehicleOffer>, RepositoryError>;

    /// Offers posted by a company, newest first.
    async fn list_by_company(
        &self,
        company: &CompanyId,
    ) -> Result<Vec<VehicleOffer>, RepositoryError>;
}
