//! Core connection traits.
//!
//! This module defines two layers:
//!
//! - `Driver` / `DriverHandle` - the narrow surface the wrapper needs from a
//!   database driver (open, execute, stream rows, close)
//! - `DatabaseConnection` - the connection contract callers use. Implementors
//!   supply `connect`/`disconnect` and expose their `ConnectionBase`; the
//!   query operations are provided on top of that base.

use std::io::Write;

use async_trait::async_trait;
use futures::stream::BoxStream;

use super::row::Record;
use super::types::ConnectionConfig;
use crate::services::database::base::ConnectionBase;
use crate::services::database::error::{DbError, DriverError};

/// An open connection owned by the driver.
///
/// Every statement or result stream created through a handle is scoped to
/// the call that created it.
#[async_trait]
pub trait DriverHandle: Send {
    /// Execute a statement that returns no rows (DDL, plain updates).
    ///
    /// Returns the number of rows affected.
    async fn execute(&mut self, sql: &str) -> Result<u64, DriverError>;

    /// Prepare `sql` and execute it with `params` bound in order.
    ///
    /// Parameters are always bound, never interpolated into the statement.
    async fn execute_with(&mut self, sql: &str, params: &[&str]) -> Result<u64, DriverError>;

    /// Run a query over the `id, nome, email` projection and stream the rows.
    fn stream_records<'a>(&'a mut self, sql: &'a str)
    -> BoxStream<'a, Result<Record, DriverError>>;

    /// Ask the driver whether the handle has been closed.
    ///
    /// This may perform a lightweight ping.
    async fn is_closed(&mut self) -> Result<bool, DriverError>;

    /// Close the handle and release the server-side session.
    async fn close(&mut self) -> Result<(), DriverError>;
}

/// A boxed driver handle.
pub type BoxedHandle = Box<dyn DriverHandle>;

/// Opens handles from a connection configuration.
#[async_trait]
pub trait Driver: Send + Sync {
    /// Open a new handle to the server described by `config`.
    async fn open(&self, config: &ConnectionConfig) -> Result<BoxedHandle, DriverError>;
}

/// The connection contract.
///
/// State machine: `Disconnected -> Connected -> Disconnected`. Only
/// `connect` can fail fatally; query operations log failures and report
/// them as `false`.
///
/// # Example
///
/// ```ignore
/// use mysql_users::services::database::{DatabaseConnection, MySqlConnection, USERS_TABLE};
///
/// let mut conn = MySqlConnection::new(config);
/// conn.connect().await?;
/// conn.insert(USERS_TABLE, "Alice", "alice@example.com").await;
/// conn.select(USERS_TABLE).await;
/// conn.disconnect().await;
/// ```
#[async_trait]
pub trait DatabaseConnection: Send {
    /// Shared connection state.
    fn base(&self) -> &ConnectionBase;

    /// Mutable access to the shared connection state.
    fn base_mut(&mut self) -> &mut ConnectionBase;

    /// Establish the connection. Calling it while connected is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `DbError::Connection` if the driver cannot open a handle.
    async fn connect(&mut self) -> Result<bool, DbError>;

    /// Close the connection. Calling it while disconnected is a no-op.
    ///
    /// Returns `false` if closing the handle failed.
    async fn disconnect(&mut self) -> bool;

    /// Get the connection configuration
    fn connection_config(&self) -> &ConnectionConfig {
        self.base().config()
    }

    /// Check if the connection is currently active.
    async fn is_connected(&mut self) -> bool {
        self.base_mut().is_connected().await
    }

    /// Get the active handle.
    ///
    /// # Errors
    ///
    /// Returns `DbError::NotConnected` if `connect` has not succeeded.
    async fn get_connection(&mut self) -> Result<&mut BoxedHandle, DbError> {
        self.base_mut().get_connection().await
    }

    /// Ensure the users table exists under `table`.
    async fn check(&mut self, table: &str) -> bool {
        self.base_mut().check(table).await
    }

    /// Print every row of `table` to the output sink.
    async fn select(&mut self, table: &str) -> bool {
        self.base_mut().select(table).await
    }

    /// Insert one row, binding `name` and `email`.
    async fn insert(&mut self, table: &str, name: &str, email: &str) -> bool {
        self.base_mut().insert(table, name, email).await
    }

    /// Read every row of `table` as typed records.
    async fn fetch_records(&mut self, table: &str) -> Result<Vec<Record>, DbError> {
        self.base_mut().fetch_records(table).await
    }

    /// Replace the sink that `select` writes rows to.
    fn set_output(&mut self, output: Box<dyn Write + Send>) {
        self.base_mut().set_output(output);
    }

    /// Get a display name for the current connection, e.g. `root@mysql://localhost/app`.
    fn display_name(&self) -> String {
        let config = self.connection_config();
        format!("{}@{}", config.user(), config.endpoint())
    }
}
