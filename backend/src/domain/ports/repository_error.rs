//! Persistence error shared by every repository port.

use super::define_port_error;

define_port_error! {
    /// Errors raised by repository adapters.
    pub enum RepositoryError {
        /// Storage could not be reached or the connection dropped.
        Connection { message: String } => "repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "repository query failed: {message}",
        /// A uniqueness or foreign-key constraint rejected the write.
        Conflict { message: String } => "repository constraint violated: {message}",
        /// The row targeted by an update no longer exists.
        NotFound { message: String } => "repository row not found: {message}",
    }
}

/// Storage constraint names that services translate into use-case errors.
///
/// Adapters report a violated constraint by name in
/// [`RepositoryError::Conflict`]; the names follow PostgreSQL's defaults for
/// the embedded migrations.
pub mod constraint {
    /// Unique account email.
    pub const USERS_EMAIL_KEY: &str = "users_email_key";
    /// Unique join code.
    pub const TRIPS_CODE_KEY: &str = "trips_code_key";
    /// Trip to event reference.
    pub const TRIPS_EVENT_ID_FKEY: &str = "trips_event_id_fkey";
    /// Trip to organizer reference.
    pub const TRIPS_ORGANIZER_ID_FKEY: &str = "trips_organizer_id_fkey";
    /// One membership per user and trip.
    pub const PARTICIPANTS_USER_ID_TRIP_ID_KEY: &str = "participants_user_id_trip_id_key";
    /// Membership to user reference.
    pub const PARTICIPANTS_USER_ID_FKEY: &str = "participants_user_id_fkey";
    /// Membership to trip reference.
    pub const PARTICIPANTS_TRIP_ID_FKEY: &str = "participants_trip_id_fkey";
}

impl RepositoryError {
    /// Whether this error is a conflict raised by the named constraint.
    pub fn violates(&self, name: &str) -> bool {
        matches!(self, Self::Conflict { message } if message == name)
    }
}

impl From<RepositoryError> for crate::domain::Error {
    fn from(value: RepositoryError) -> Self {
        match value {
            RepositoryError::Connection { message } => {
                Self::service_unavailable(format!("storage unavailable: {message}"))
            }
            RepositoryError::Query { message } => Self::internal(format!("storage error: {message}")),
            RepositoryError::Conflict { message } => Self::conflict(message),
            RepositoryError::NotFound { message } => Self::not_found(message),
        }
    }
}
