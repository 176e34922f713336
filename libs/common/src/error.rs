//! Custom error types for the common library
//!
//! This module defines application-specific error types that can be used
//! throughout the application.

use sqlx::Error as SqlxError;
use sqlx::migrate::MigrateError;
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
    Migration(#[source] MigrateError),

    /// Configuration error
    #[error("Database configuration error: {0}")]
    Configuration(String),

    /// A stored value could not be mapped onto a domain type
    #[error("Database decode error: {0}")]
    Decode(String),
}

impl From<SqlxError> for DatabaseError {
    fn from(err: SqlxError) -> Self {
        DatabaseError::Query(err)
    }
}

/// Type alias for Result with DatabaseError
pub type DatabaseResult<T> = Result<T, DatabaseError>;

/// Errors raised while loading service settings
#[derive(Error, Debug)]
pub enum SettingsError {
    /// A required variable is missing
    #[error("{0} environment variable not set")]
    Missing(&'static str),

    /// A value could not be read or parsed
    #[error("Invalid setting {name}: {reason}")]
    Invalid { name: &'static str, reason: String },

    /// Layered configuration failed to build or deserialize
    #[error(transparent)]
    Config(#[from] config::ConfigError),
}
