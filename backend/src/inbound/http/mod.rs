//! HTTP inbound adapter: the GraphQL endpoint, health probes and bearer
//! identity extraction.

pub mod auth;
pub mod graphql;
pub mod health;
pub mod state;

pub use state::HttpState;
