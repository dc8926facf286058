//! Custom error types for the common library
//!
//! This module defines the store error taxonomy shared by both services.
//! Constraint failures are classified so callers can map them to client
//! errors instead of treating every store failure as an internal one.

use sqlx::Error as SqlxError;
use thiserror::Error;

/// Custom error type for database operations
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Error occurred during database connection
    #[error("Database connection error: {0}")]
    Connection(#[source] SqlxError),

    /// Error occurred during database query execution
    #[error("Database query error: {0}")]
    Query(#[source] SqlxError),

    /// Error occurred during database migration
    #[error("Database migration error: {0}")]
    Migration(String),

    /// Configuration error
    #[error("Database configuration error: {0}")]
    Configuration(String),

    /// A unique index rejected the write
    #[error("Unique constraint violation{}", constraint_suffix(.constraint))]
    UniqueViolation { constraint: Option<String> },

    /// A referenced row does not exist
    #[error("Foreign key violation{}", constraint_suffix(.constraint))]
    ForeignKeyViolation { constraint: Option<String> },

    /// A check constraint rejected the row
    #[error("Check constraint violation{}", constraint_suffix(.constraint))]
    CheckViolation { constraint: Option<String> },
}

fn constraint_suffix(constraint: &Option<String>) -> String {
    constraint
        .as_ref()
        .map(|name| format!(" ({name})"))
        .unwrap_or_default()
}

impl DatabaseError {
    /// True when the failure came from a unique index
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, DatabaseError::UniqueViolation { .. })
    }
}

impl From<SqlxError> for DatabaseError {
    fn from(err: SqlxError) -> Self {
        if let SqlxError::Database(db_err) = &err {
            let constraint = db_err.constraint().map(str::to_string);

            if db_err.is_unique_violation() {
                return DatabaseError::UniqueViolation { constraint };
            }
            if db_err.is_foreign_key_violation() {
                return DatabaseError::ForeignKeyViolation { constraint };
            }
            if db_err.is_check_violation() {
                return DatabaseError::CheckViolation { constraint };
            }
        }

        match err {
            SqlxError::PoolTimedOut | SqlxError::PoolClosed | SqlxError::Io(_) => {
                DatabaseError::Connection(err)
            }
            other => DatabaseError::Query(other),
        }
    }
}

/// Type alias for Result with DatabaseError
pub type DatabaseResult<T> = Result<T, DatabaseError>;
