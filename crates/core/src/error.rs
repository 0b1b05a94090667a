//! Error types for schema provisioning.
//!
//! The executor recovers from exactly one error class: a CREATE that targets
//! a name which already exists. Classification is by SQLSTATE, not by driver
//! exception type, so a re-run against an already-provisioned database
//! downgrades those steps to `skipped` instead of failing.

use thiserror::Error;

/// Result type alias for provisioning operations
pub type SeedbedResult<T> = Result<T, SeedbedError>;

/// Error type covering both flows and the report writer
#[derive(Debug, Error)]
pub enum SeedbedError {
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Connection error: {message}")]
    Connection { message: String },

    #[error("Database error: {message}")]
    Database { message: String },

    #[error("Rollback error: {message}")]
    Rollback { message: String },

    #[error("Report IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Report serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SeedbedError {
    /// Create a new configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a new connection error
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Create a new database error
    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
        }
    }

    /// Create a new rollback error
    pub fn rollback(message: impl Into<String>) -> Self {
        Self::Rollback {
            message: message.into(),
        }
    }
}

/// SQLSTATE codes Postgres reports when a CREATE targets an existing name:
/// duplicate relation (tables and indexes), duplicate object (policies,
/// triggers), duplicate function, duplicate schema.
const DUPLICATE_OBJECT_CODES: &[&str] = &["42P07", "42710", "42723", "42P06"];

/// True when the SQLSTATE indicates the object a step tried to create is
/// already present.
pub fn is_duplicate_object_code(code: &str) -> bool {
    DUPLICATE_OBJECT_CODES.contains(&code)
}

/// Classify a step execution error: duplicate-object failures are
/// recoverable, anything else halts the remaining steps.
pub fn is_duplicate_object_error(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err
            .code()
            .map(|code| is_duplicate_object_code(&code))
            .unwrap_or(false),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_relation_codes_are_recoverable() {
        // duplicate_table covers indexes as well as tables
        assert!(is_duplicate_object_code("42P07"));
        // duplicate_object covers policies and triggers
        assert!(is_duplicate_object_code("42710"));
        assert!(is_duplicate_object_code("42723"));
        assert!(is_duplicate_object_code("42P06"));
    }

    #[test]
    fn test_other_codes_are_fatal() {
        // undefined_table, syntax_error, insufficient_privilege
        assert!(!is_duplicate_object_code("42P01"));
        assert!(!is_duplicate_object_code("42601"));
        assert!(!is_duplicate_object_code("42501"));
        assert!(!is_duplicate_object_code(""));
    }

    #[test]
    fn test_non_database_errors_are_not_duplicates() {
        assert!(!is_duplicate_object_error(&sqlx::Error::RowNotFound));
        assert!(!is_duplicate_object_error(&sqlx::Error::PoolClosed));
    }

    #[test]
    fn test_error_display() {
        let err = SeedbedError::configuration("missing credentials");
        assert_eq!(
            err.to_string(),
            "Configuration error: missing credentials"
        );

        let err = SeedbedError::connection("refused");
        assert_eq!(err.to_string(), "Connection error: refused");
    }
}
