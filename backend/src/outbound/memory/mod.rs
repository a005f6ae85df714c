//! In-process storage adapter.
//!
//! [`MemoryStore`] implements every repository port over plain maps behind
//! one mutex, enforcing the same unique and foreign-key rules as the
//! PostgreSQL schema so services behave identically against either adapter.
//! It backs the server when no database URL is configured and the
//! end-to-end tests.

mod store;

pub use store::MemoryStore;
