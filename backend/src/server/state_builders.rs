//! Builders wiring port implementations into the GraphQL and HTTP state.

use std::sync::Arc;

use color_eyre::eyre::{Result, WrapErr};
use tracing::{info, warn};

use eventgo::domain::ports::{PasswordHasher, StorageHealth, TokenService};
use eventgo::inbound::graphql::{Ports, Services, build_schema};
use eventgo::inbound::http::HttpState;
use eventgo::outbound::memory::MemoryStore;
use eventgo::outbound::persistence::{
    DbPool, DieselCompanyRepository, DieselCostItemRepository, DieselEventRepository,
    DieselParticipantRepository, DieselStorageHealth, DieselTripRepository, DieselUserRepository,
    DieselVehicleOfferRepository, PoolConfig, run_pending_migrations,
};
use eventgo::outbound::security::{BcryptPasswordHasher, JwtTokenService};

use super::config::AppSettings;

/// Ports plus the storage probe used by `/health`.
pub struct Wiring {
    pub ports: Ports,
    pub storage: Arc<dyn StorageHealth>,
}

fn diesel_ports(
    pool: &DbPool,
    hasher: Arc<dyn PasswordHasher>,
    tokens: Arc<dyn TokenService>,
) -> Ports {
    Ports {
        users: Arc::new(DieselUserRepository::new(pool.clone())),
        companies: Arc::new(DieselCompanyRepository::new(pool.clone())),
        events: Arc::new(DieselEventRepository::new(pool.clone())),
        trips: Arc::new(DieselTripRepository::new(pool.clone())),
        participants: Arc::new(DieselParticipantRepository::new(pool.clone())),
        cost_items: Arc::new(DieselCostItemRepository::new(pool.clone())),
        vehicle_offers: Arc::new(DieselVehicleOfferRepository::new(pool.clone())),
        hasher,
        tokens,
    }
}

/// Choose PostgreSQL when a database URL is configured, the in-memory
/// store otherwise. Pending migrations are applied before the pool opens.
pub async fn build_wiring(settings: &AppSettings) -> Result<Wiring> {
    let hasher: Arc<dyn PasswordHasher> =
        Arc::new(BcryptPasswordHasher::new(settings.bcrypt_cost()));
    let tokens: Arc<dyn TokenService> = Arc::new(JwtTokenService::new(
        &settings.jwt_secret()?,
        settings.token_ttl()?,
    ));

    match settings.database_url.as_deref() {
        Some(url) => {
            run_pending_migrations(url)
                .await
                .wrap_err("applying database migrations")?;
            let pool = DbPool::new(
                PoolConfig::new(url).with_max_size(settings.db_max_connections()),
            )
            .await
            .wrap_err("building the database pool")?;
            info!(max_connections = settings.db_max_connections(), "using PostgreSQL storage");
            Ok(Wiring {
                ports: diesel_ports(&pool, hasher, tokens),
                storage: Arc::new(DieselStorageHealth::new(pool)),
            })
        }
        None => {
            warn!("EVENTGO_DATABASE_URL not set; data lives in memory and is lost on exit");
            let store = Arc::new(MemoryStore::new());
            Ok(Wiring {
                ports: Ports::in_memory(&store, hasher, tokens),
                storage: store,
            })
        }
    }
}

/// Build the handler state: the schema over the configured services plus
/// the token port used for bearer extraction.
pub fn build_http_state(ports: &Ports, settings: &AppSettings) -> HttpState {
    let schema = build_schema(Services::new(ports, settings.policy()));
    HttpState::new(schema, Arc::clone(&ports.tokens))
}
