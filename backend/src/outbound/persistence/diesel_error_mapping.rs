//! Shared Diesel error mapping for every repository adapter.
//!
//! Constraint violations become `Conflict` carrying the constraint name so
//! services can turn them into use-case messages. Unique and foreign-key
//! violations are the only database errors a caller can trigger on purpose.

use tracing::debug;

use crate::domain::ports::RepositoryError;

use super::pool::PoolError;

/// Map pool errors to repository connection errors.
pub(crate) fn map_pool_error(error: PoolError) -> RepositoryError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            RepositoryError::connection(message)
        }
    }
}

/// Map Diesel errors to repository errors.
pub(crate) fn map_diesel_error(error: diesel::result::Error) -> RepositoryError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => RepositoryError::not_found("record not found"),
        DieselError::QueryBuilderError(_) => RepositoryError::query("database query error"),
        DieselError::DatabaseError(
            kind @ (DatabaseErrorKind::UniqueViolation | DatabaseErrorKind::ForeignKeyViolation),
            info,
        ) => {
            let constraint = info.constraint_name().unwrap_or(match kind {
                DatabaseErrorKind::UniqueViolation => "unique constraint",
                _ => "foreign key constraint",
            });
            RepositoryError::conflict(constraint)
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            RepositoryError::connection("database connection error")
        }
        DieselError::DatabaseError(_, _) => RepositoryError::query("database error"),
        _ => RepositoryError::query("database error"),
    }
}
