//! Shared HTTP adapter state.
//!
//! Handlers receive this through `actix_web::web::Data`, so they depend only
//! on the schema and the token port and stay testable without I/O.

use std::sync::Arc;

use crate::domain::ports::TokenService;
use crate::inbound::graphql::AppSchema;

/// Dependency bundle for the GraphQL handler.
#[derive(Clone)]
pub struct HttpState {
    pub schema: AppSchema,
    pub tokens: Arc<dyn TokenService>,
}

impl HttpState {
    /// Bundle the schema with the token verifier.
    pub fn new(schema: AppSchema, tokens: Arc<dyn TokenService>) -> Self {
        Self { schema, tokens }
    }
}
