//! Error types for the connection wrapper.

use std::borrow::Cow;

use sqlx::mysql::MySqlDatabaseError;
use thiserror::Error;

/// Errors raised by configuration, connection and query operations.
#[derive(Debug, Error)]
pub enum DbError {
    /// Missing or empty configuration value
    #[error("invalid configuration: {0}")]
    Validation(String),

    /// The driver could not open a connection
    #[error("could not connect to the database: {0}")]
    Connection(#[source] DriverError),

    /// A statement failed on an open connection
    #[error("query failed: {0}")]
    Query(#[from] DriverError),

    /// Operation attempted without an active connection
    #[error("connection is not active, call connect() first")]
    NotConnected,
}

/// An error reported by the underlying driver.
///
/// Keeps the server error number and SQL state when the driver reports them,
/// so failures can be logged with all three pieces.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct DriverError {
    /// Server error number (e.g. 1062 for a duplicate key)
    pub code: Option<u16>,
    /// Five-character SQLSTATE
    pub sql_state: Option<String>,
    /// Human readable message
    pub message: String,
}

impl DriverError {
    /// Create an error carrying only a message
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: None,
            sql_state: None,
            message: message.into(),
        }
    }

    /// Attach a server error number and SQL state
    pub fn with_code(mut self, code: u16, sql_state: impl Into<String>) -> Self {
        self.code = Some(code);
        self.sql_state = Some(sql_state.into());
        self
    }

    /// Log this error with its code, SQL state and message.
    pub fn log(&self, context: &str) {
        tracing::error!(
            code = ?self.code,
            sql_state = self.sql_state.as_deref().unwrap_or("-"),
            message = %self.message,
            "{}",
            context
        );
    }
}

impl From<sqlx::Error> for DriverError {
    fn from(err: sqlx::Error) -> Self {
        let Some(db_err) = err.as_database_error() else {
            return Self::new(err.to_string());
        };

        let sql_state = db_err.code().map(Cow::into_owned);
        let code = db_err
            .try_downcast_ref::<MySqlDatabaseError>()
            .map(MySqlDatabaseError::number);

        Self {
            code,
            sql_state,
            message: db_err.message().to_string(),
        }
    }
}
