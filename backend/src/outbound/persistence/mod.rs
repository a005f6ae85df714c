//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the domain repository ports backed by
//! PostgreSQL via `diesel-async` and `bb8` pooling.
//!
//! # Architecture
//!
//! - **Thin adapters**: repositories only translate between Diesel rows and
//!   domain types. Ownership checks and state rules live in the services.
//! - **Internal models**: row structs (`models.rs`) and table definitions
//!   (`schema.rs`) never leave this module.
//! - **One error type**: every Diesel and pool failure is mapped to
//!   [`RepositoryError`](crate::domain::ports::RepositoryError).
//!
//! # Example
//!
//! ```no_run
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! use eventgo::outbound::persistence::{DbPool, DieselTripRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/eventgo")).await?;
//! let trips = DieselTripRepository::new(pool);
//! # let _ = trips;
//! # Ok(())
//! # }
//! ```

mod diesel_company_repository;
mod diesel_cost_item_repository;
mod diesel_error_mapping;
mod diesel_event_repository;
mod diesel_helpers;
mod diesel_participant_repository;
mod diesel_storage_health;
mod diesel_trip_repository;
mod diesel_user_repository;
mod diesel_vehicle_offer_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_company_repository::DieselCompanyRepository;
pub use diesel_cost_item_repository::DieselCostItemRepository;
pub use diesel_event_repository::DieselEventRepository;
pub use diesel_participant_repository::DieselParticipantRepository;
pub use diesel_storage_health::DieselStorageHealth;
pub use diesel_trip_repository::DieselTripRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use diesel_vehicle_offer_repository::DieselVehicleOfferRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
