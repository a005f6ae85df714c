//! Domain primitives, aggregates and use-case services.
//!
//! Purpose: Define strongly typed entities for users, companies, events,
//! trips, participants, cost items and vehicle offers, plus the services
//! that mutate them. Services depend only on the traits in [`ports`], so the
//! GraphQL layer and the tests can run them against Diesel, the in-memory
//! store or mocks alike.
//!
//! Public surface:
//! - Error (alias to `error::Error`): use-case failure with a stable code.
//! - `AuthorizationPolicy`: the single place ownership rules live.
//! - `*Service`: one service per aggregate, generic over its ports.

pub mod error;
pub mod ports;

mod auth;
mod auth_service;
mod company;
mod company_service;
mod cost_item;
mod cost_item_service;
mod costs;
mod event;
mod event_service;
mod ids;
mod listing;
mod participant;
mod participant_service;
mod policy;
mod trace_id;
mod trip;
mod trip_service;
mod user;
mod validation;
mod vehicle_offer;
mod vehicle_offer_service;

pub use self::auth::{
    Anonymous, AuthPayload, CallerIdentity, CredentialsValidationError, Identity,
    LoginCredentials, PASSWORD_MIN, SignupRequest, require_identity,
};
pub use self::auth_service::AuthService;
pub use self::company::{Company, CompanyDraft};
pub use self::company_service::CompanyService;
pub use self::cost_item::{CostItem, CostItemDraft};
pub use self::cost_item_service::CostItemService;
pub use self::costs::{per_person_share, trip_total};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::event::{Event, EventDraft};
pub use self::event_service::EventService;
pub use self::ids::{
    CompanyId, CostItemId, EventId, IdParseError, ParticipantId, TripId, UserId, VehicleOfferId,
};
pub use self::listing::{DEFAULT_LIMIT, EventsFilter, MAX_LIMIT, Page, TripsFilter};
pub use self::participant::{ORGANIZER_PUBLIC_INFO, Participant};
pub use self::participant_service::ParticipantService;
pub use self::policy::{Action, AuthorizationPolicy, CompanyCreationPolicy, Decision, Resource};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::trip::{JOIN_CODE_LEN, JoinCode, JoinCodeError, Trip, TripDraft};
pub use self::trip_service::TripService;
pub use self::user::{
    EmailAddress, NAME_MAX, NewUser, Role, User, UserValidationError, validate_name,
};
pub use self::validation::{AMOUNT_MAX, DraftValidationError, TEXT_MAX};
pub use self::vehicle_offer::{VehicleOffer, VehicleOfferDraft, VehicleOfferInput};
pub use self::vehicle_offer_service::VehicleOfferService;

/// Convenient use-case result alias.
///
/// # Examples
/// ```
/// use eventgo::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<()> {
///     Err(Error::forbidden("nope"))
/// }
/// assert!(handler().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;
