//! MySQL connection implementation.
//!
//! `MySqlDriver` opens a single SQLx `MySqlConnection` (no pool) and wraps it
//! in a `MySqlHandle`. `MySqlConnection` implements the `DatabaseConnection`
//! contract on top of a `ConnectionBase`.

use std::sync::Arc;

use async_trait::async_trait;
use futures::stream::{self, BoxStream};
use futures::StreamExt;
use sqlx::Connection;

use super::types::MySqlValueConverter;
use crate::services::database::base::{ConnectionBase, USERS_TABLE};
use crate::services::database::error::{DbError, DriverError};
use crate::services::database::traits::{
    BoxedHandle, ConnectionConfig, DatabaseConnection, Driver, DriverHandle,
    Record,
};

/// Driver that opens MySQL connections through SQLx.
#[derive(Debug, Clone, Copy, Default)]
pub struct MySqlDriver;

#[async_trait]
impl Driver for MySqlDriver {
    async fn open(&self, config: &ConnectionConfig) -> Result<BoxedHandle, DriverError> {
        let options = MySqlValueConverter::connect_options(config)?;
        let conn = sqlx::MySqlConnection::connect_with(&options).await?;

        Ok(Box::new(MySqlHandle { conn: Some(conn) }))
    }
}

/// An open SQLx connection.
///
/// `conn` is `None` once the handle has been closed.
pub struct MySqlHandle {
    conn: Option<sqlx::MySqlConnection>,
}

impl MySqlHandle {
    fn conn(&mut self) -> Result<&mut sqlx::MySqlConnection, DriverError> {
        self.conn
            .as_mut()
            .ok_or_else(|| DriverError::new("connection is closed"))
    }
}

#[async_trait]
impl DriverHandle for MySqlHandle {
    async fn execute(&mut self, sql: &str) -> Result<u64, DriverError> {
        let conn = self.conn()?;
        let result = sqlx::query(sql).execute(&mut *conn).await?;
        Ok(result.rows_affected())
    }

    async fn execute_with(&mut self, sql: &str, params: &[&str]) -> Result<u64, DriverError> {
        let conn = self.conn()?;

        let mut query = sqlx::query(sql);
        for param in params {
            query = query.bind(param.to_string());
        }

        let result = query.execute(&mut *conn).await?;
        Ok(result.rows_affected())
    }

    fn stream_records<'a>(
        &'a mut self,
        sql: &'a str,
    ) -> BoxStream<'a, Result<Record, DriverError>> {
        match self.conn.as_mut() {
            Some(conn) => sqlx::query(sql)
                .fetch(conn)
                .map(|row| {
                    row.and_then(|row| MySqlValueConverter::convert_row(&row))
                        .map_err(DriverError::from)
                })
                .boxed(),
            None => stream::once(async { Err(DriverError::new("connection is closed")) }).boxed(),
        }
    }

    async fn is_closed(&mut self) -> Result<bool, DriverError> {
        match self.conn.as_mut() {
            Some(conn) => {
                conn.ping().await?;
                Ok(false)
            }
            None => Ok(true),
        }
    }

    async fn close(&mut self) -> Result<(), DriverError> {
        if let Some(conn) = self.conn.take() {
            conn.close().await?;
        }
        Ok(())
    }
}

/// MySQL database connection.
///
/// Holds one handle at most. `connect` opens it and immediately makes sure
/// the users table exists; `disconnect` closes it.
pub struct MySqlConnection {
    base: ConnectionBase,
    driver: Arc<dyn Driver>,
}

impl std::fmt::Debug for MySqlConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MySqlConnection")
            .field("base", &self.base)
            .field("driver", &"<Driver>")
            .finish()
    }
}

impl MySqlConnection {
    /// Create a new MySQL connection from configuration.
    ///
    /// This does not connect immediately - call `connect()` to establish the connection.
    pub fn new(config: ConnectionConfig) -> Self {
        Self::with_driver(config, Arc::new(MySqlDriver))
    }

    /// Create a connection that opens its handle through `driver`.
    pub fn with_driver(config: ConnectionConfig, driver: Arc<dyn Driver>) -> Self {
        Self {
            base: ConnectionBase::new(config),
            driver,
        }
    }
}

#[async_trait]
impl DatabaseConnection for MySqlConnection {
    fn base(&self) -> &ConnectionBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ConnectionBase {
        &mut self.base
    }

    async fn connect(&mut self) -> Result<bool, DbError> {
        if self.base.is_connected().await {
            tracing::info!("Connection is already active");
            return Ok(true);
        }

        tracing::info!(user = self.base.config().user(), "Connecting to MySQL database");
        let handle = match self.driver.open(self.base.config()).await {
            Ok(handle) => handle,
            Err(e) => {
                e.log("Database connection failed");
                return Err(DbError::Connection(e));
            }
        };
        self.base.attach(handle);
        tracing::info!("Connection established");

        // A failed check is already logged; the connection stays usable.
        if !self.base.check(USERS_TABLE).await {
            tracing::warn!(table = USERS_TABLE, "Connected without verifying table");
        }

        Ok(true)
    }

    async fn disconnect(&mut self) -> bool {
        if !self.base.is_connected().await {
            // A handle the driver already reports closed is just dropped.
            self.base.detach();
            tracing::info!("No active connection to close");
            return true;
        }

        let Some(mut handle) = self.base.detach() else {
            return true;
        };

        tracing::info!("Closing database connection");
        match handle.close().await {
            Ok(()) => {
                tracing::info!("Connection closed");
                true
            }
            Err(e) => {
                e.log("Error closing database connection");
                false
            }
        }
    }
}
