//! GraphQL inbound adapter.
//!
//! Purpose: expose the domain use-cases as a single GraphQL schema. The
//! schema holds the [`Services`] bundle; the HTTP handler attaches the
//! caller's [`CallerIdentity`](crate::domain::CallerIdentity) to each request.
//!
//! Domain errors are returned with `extensions.code` (snake_case
//! [`ErrorCode`](crate::domain::ErrorCode)) and `extensions.traceId`.

mod context;
mod error;
mod inputs;
mod mutation;
mod query;
mod types;

use async_graphql::{EmptySubscription, Schema};

pub use context::{
    DynAuthService, DynCompanyService, DynCostItemService, DynEventService,
    DynParticipantService, DynTripService, DynVehicleOfferService, Ports, Services,
};
pub use mutation::MutationRoot;
pub use query::QueryRoot;

/// Executable schema served at `/graphql`.
pub type AppSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

/// Build the schema around the given use-cases.
///
/// # Examples
/// ```
/// use std::sync::Arc;
///
/// use eventgo::domain::AuthorizationPolicy;
/// use eventgo::inbound::graphql::{Ports, Services, build_schema};
/// use eventgo::outbound::memory::MemoryStore;
/// use eventgo::outbound::security::{BcryptPasswordHasher, JwtTokenService};
/// use zeroize::Zeroizing;
///
/// let store = Arc::new(MemoryStore::new());
/// let tokens = JwtTokenService::with_default_ttl(&Zeroizing::new("secret".to_owned()));
/// let ports = Ports::in_memory(&store, Arc::new(BcryptPasswordHasher::default()), Arc::new(tokens));
/// let schema = build_schema(Services::new(&ports, AuthorizationPolicy::default()));
/// assert!(schema.sdl().contains("joinTrip"));
/// ```
pub fn build_schema(services: Services) -> AppSchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(services)
        .finish()
}
