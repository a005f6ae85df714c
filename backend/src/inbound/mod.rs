//! Driving adapters translating transport requests into domain use-cases.

pub mod graphql;
pub mod http;
