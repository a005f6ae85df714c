//! EventGo backend library: domain, adapters and middleware for the group
//! trip GraphQL service.

pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

pub use middleware::Trace;
