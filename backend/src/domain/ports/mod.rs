//! Domain ports for the hexagonal boundary.
//!
//! Driven adapters in `outbound` implement these traits; services depend on
//! them through `Arc`s so tests can substitute mocks or the in-memory store.

mod macros;
pub(crate) use macros::define_port_error;

mod company_repository;
mod cost_item_repository;
mod event_repository;
mod participant_repository;
mod password_hasher;
mod repository_error;
mod storage_health;
mod token_service;
mod trip_repository;
mod user_repository;
mod vehicle_offer_repository;

pub use company_repository::CompanyRepository;
#[cfg(test)]
pub use company_repository::MockCompanyRepository;
pub use cost_item_repository::CostItemRepository;
#[cfg(test)]
pub use cost_item_repository::MockCostItemRepository;
pub use event_repository::EventRepository;
#[cfg(test)]
pub use event_repository::MockEventRepository;
#[cfg(test)]
pub use participant_repository::MockParticipantRepository;
pub use participant_repository::ParticipantRepository;
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHashError, PasswordHasher};
pub use repository_error::{RepositoryError, constraint};
#[cfg(test)]
pub use storage_health::MockStorageHealth;
pub use storage_health::StorageHealth;
#[cfg(test)]
pub use token_service::MockTokenService;
pub use token_service::{TokenError, TokenService};
#[cfg(test)]
pub use trip_repository::MockTripRepository;
pub use trip_repository::TripRepository;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::UserRepository;
#[cfg(test)]
pub use vehicle_offer_repository::MockVehicleOfferRepository;
pub use vehicle_offer_repository::VehicleOfferRepository;
