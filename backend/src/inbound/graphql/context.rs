//! Request context shared by GraphQL resolvers.
//!
//! Services are stored once in the schema data; the caller identity is
//! attached per request by the HTTP handler.

use std::str::FromStr;
use std::sync::Arc;

use async_graphql::{Context, ID};
use serde_json::json;

use crate::domain::ports::{
    CompanyRepository, CostItemRepository, EventRepository, ParticipantRepository,
    PasswordHasher, TokenService, TripRepository, UserRepository, VehicleOfferRepository,
};
use crate::domain::{
    Anonymous, AuthService, AuthorizationPolicy, CallerIdentity, CompanyService, CostItemService,
    Error, EventService, ParticipantService, TripService, VehicleOfferService,
};
use crate::outbound::memory::MemoryStore;

/// Sign-up and login over boxed ports.
pub type DynAuthService = AuthService<dyn UserRepository, dyn PasswordHasher, dyn TokenService>;
/// Company use-cases over boxed ports.
pub type DynCompanyService = CompanyService<dyn CompanyRepository>;
/// Event use-cases over boxed ports.
pub type DynEventService = EventService<dyn EventRepository, dyn CompanyRepository>;
/// Trip use-cases over boxed ports.
pub type DynTripService = TripService<
    dyn TripRepository,
    dyn EventRepository,
    dyn ParticipantRepository,
    dyn CostItemRepository,
>;
/// Membership use-cases over boxed ports.
pub type DynParticipantService = ParticipantService<dyn ParticipantRepository, dyn TripRepository>;
/// Cost item use-cases over boxed ports.
pub type DynCostItemService =
    CostItemService<dyn CostItemRepository, dyn TripRepository, dyn ParticipantRepository>;
/// Vehicle offer use-cases over boxed ports.
pub type DynVehicleOfferService =
    VehicleOfferService<dyn VehicleOfferRepository, dyn CompanyRepository, dyn TripRepository>;

/// Parameter object bundling every port implementation.
#[derive(Clone)]
pub struct Ports {
    pub users: Arc<dyn UserRepository>,
    pub companies: Arc<dyn CompanyRepository>,
    pub events: Arc<dyn EventRepository>,
    pub trips: Arc<dyn TripRepository>,
    pub participants: Arc<dyn ParticipantRepository>,
    pub cost_items: Arc<dyn CostItemRepository>,
    pub vehicle_offers: Arc<dyn VehicleOfferRepository>,
    pub hasher: Arc<dyn PasswordHasher>,
    pub tokens: Arc<dyn TokenService>,
}

impl Ports {
    /// Route every repository to one in-memory store.
    pub fn in_memory(
        store: &Arc<MemoryStore>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: Arc<dyn TokenService>,
    ) -> Self {
        Self {
            users: store.clone(),
            companies: store.clone(),
            events: store.clone(),
            trips: store.clone(),
            participants: store.clone(),
            cost_items: store.clone(),
            vehicle_offers: store.clone(),
            hasher,
            tokens,
        }
    }
}

/// Use-cases reachable from resolvers.
#[derive(Clone)]
pub struct Services {
    pub auth: DynAuthService,
    pub companies: DynCompanyService,
    pub events: DynEventService,
    pub trips: DynTripService,
    pub participants: DynParticipantService,
    pub cost_items: DynCostItemService,
    pub vehicle_offers: DynVehicleOfferService,
}

impl Services {
    /// Build every use-case over the given ports under one policy.
    pub fn new(ports: &Ports, policy: AuthorizationPolicy) -> Self {
        Self {
            auth: AuthService::new(
                Arc::clone(&ports.users),
                Arc::clone(&ports.hasher),
                Arc::clone(&ports.tokens),
            ),
            companies: CompanyService::new(Arc::clone(&ports.companies), policy),
            events: EventService::new(
                Arc::clone(&ports.events),
                Arc::clone(&ports.companies),
                policy,
            ),
            trips: TripService::new(
                Arc::clone(&ports.trips),
                Arc::clone(&ports.events),
                Arc::clone(&ports.participants),
                Arc::clone(&ports.cost_items),
                policy,
            ),
            participants: ParticipantService::new(
                Arc::clone(&ports.participants),
                Arc::clone(&ports.trips),
                policy,
            ),
            cost_items: CostItemService::new(
                Arc::clone(&ports.cost_items),
                Arc::clone(&ports.trips),
                Arc::clone(&ports.participants),
                policy,
            ),
            vehicle_offers: VehicleOfferService::new(
                Arc::clone(&ports.vehicle_offers),
                Arc::clone(&ports.companies),
                Arc::clone(&ports.trips),
                policy,
            ),
        }
    }
}

pub(crate) fn services<'a>(ctx: &Context<'a>) -> async_graphql::Result<&'a Services> {
    ctx.data::<Services>()
}

/// The request's caller; anonymous when the handler attached nothing.
pub(crate) fn caller(ctx: &Context<'_>) -> CallerIdentity {
    ctx.data_opt::<CallerIdentity>()
        .copied()
        .unwrap_or(Err(Anonymous::MissingToken))
}

/// Parse a GraphQL `ID` argument into a typed identifier.
pub(crate) fn parse_id<T>(field: &'static str, id: &ID) -> Result<T, Error>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    id.parse::<T>().map_err(|err| {
        Error::invalid_request(err.to_string()).with_details(json!({ "field": field }))
    })
}
