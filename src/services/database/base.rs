//! Shared connection state and query operations.
//!
//! `ConnectionBase` owns the configuration, the optional driver handle and
//! the output sink. Concrete connections embed it and only decide how the
//! handle is opened and closed.

use std::io::{self, Write};

use futures::StreamExt;

use super::error::{DbError, DriverError};
use super::traits::{BoxedHandle, ConnectionConfig, Record};

/// Name of the table created on connect.
pub const USERS_TABLE: &str = "usuarios";

/// Build the `CREATE TABLE` statement for the users layout under `table`.
pub fn create_table_sql(table: &str) -> String {
    format!(
        "CREATE TABLE IF NOT EXISTS {} (\
         id INT AUTO_INCREMENT PRIMARY KEY, \
         nome VARCHAR(100) NOT NULL, \
         email VARCHAR(100) NOT NULL UNIQUE, \
         data_cadastro TIMESTAMP DEFAULT CURRENT_TIMESTAMP\
         )",
        table
    )
}

/// Build the projection query used by `select`.
pub fn select_sql(table: &str) -> String {
    format!("SELECT id, nome, email FROM {}", table)
}

/// Build the parameterized insert statement.
pub fn insert_sql(table: &str) -> String {
    format!("INSERT INTO {} (nome, email) VALUES (?, ?)", table)
}

/// Connection state shared by every backend.
pub struct ConnectionBase {
    config: ConnectionConfig,
    handle: Option<BoxedHandle>,
    output: Box<dyn Write + Send>,
}

impl std::fmt::Debug for ConnectionBase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionBase")
            .field("config", &self.config)
            .field("handle", &self.handle.as_ref().map(|_| "<handle>"))
            .finish()
    }
}

impl ConnectionBase {
    /// Create a disconnected base that writes rows to stdout.
    pub fn new(config: ConnectionConfig) -> Self {
        Self {
            config,
            handle: None,
            output: Box::new(io::stdout()),
        }
    }

    /// Replace the output sink.
    pub fn with_output(mut self, output: Box<dyn Write + Send>) -> Self {
        self.output = output;
        self
    }

    pub fn set_output(&mut self, output: Box<dyn Write + Send>) {
        self.output = output;
    }

    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    /// True if a handle is held, without asking the driver.
    pub fn has_handle(&self) -> bool {
        self.handle.is_some()
    }

    /// Store a freshly opened handle. Any previous handle is dropped.
    pub(crate) fn attach(&mut self, handle: BoxedHandle) {
        self.handle = Some(handle);
    }

    /// Give up ownership of the handle, leaving the base disconnected.
    pub(crate) fn detach(&mut self) -> Option<BoxedHandle> {
        self.handle.take()
    }

    /// True iff a handle is held and the driver does not report it closed.
    ///
    /// Errors from the driver while probing count as "not connected".
    pub async fn is_connected(&mut self) -> bool {
        let Some(handle) = self.handle.as_mut() else {
            return false;
        };

        match handle.is_closed().await {
            Ok(closed) => !closed,
            Err(e) => {
                tracing::warn!(error = %e, "Error checking connection status");
                false
            }
        }
    }

    /// Get the active handle.
    pub async fn get_connection(&mut self) -> Result<&mut BoxedHandle, DbError> {
        if !self.is_connected().await {
            return Err(DbError::NotConnected);
        }
        self.handle.as_mut().ok_or(DbError::NotConnected)
    }

    /// Ensure `table` exists with the users layout.
    ///
    /// Idempotent. Returns `false` if not connected or if the statement fails.
    pub async fn check(&mut self, table: &str) -> bool {
        if !self.ensure_connected("verify", table).await {
            return false;
        }
        let Some(handle) = self.handle.as_mut() else {
            return false;
        };

        tracing::info!(table, "Checking/creating table");
        match handle.execute(&create_table_sql(table)).await {
            Ok(_) => {
                tracing::info!(table, "Table checked/created");
                true
            }
            Err(e) => {
                e.log(&format!("Failed to check/create table '{}'", table));
                false
            }
        }
    }

    /// Stream every row of `table` to the output sink.
    ///
    /// Returns `true` even when the table is empty; `false` only when not
    /// connected or when the query fails.
    pub async fn select(&mut self, table: &str) -> bool {
        if !self.ensure_connected("select from", table).await {
            return false;
        }
        let Some(handle) = self.handle.as_mut() else {
            return false;
        };

        tracing::debug!(table, "Running select");
        let sql = select_sql(table);
        let result = {
            let mut rows = handle.stream_records(&sql);
            Self::write_rows(&mut *self.output, table, &mut rows).await
        };

        match result {
            Ok(count) => {
                tracing::debug!(table, rows = count, "Select finished");
                true
            }
            Err(SelectError::Driver(e)) => {
                e.log(&format!("Failed to run SELECT on table '{}'", table));
                false
            }
            Err(SelectError::Output(e)) => {
                tracing::error!(table, error = %e, "Failed to write select output");
                false
            }
        }
    }

    /// Insert one row with `name` and `email` bound as parameters.
    ///
    /// Returns `true` iff the driver reports at least one affected row.
    pub async fn insert(&mut self, table: &str, name: &str, email: &str) -> bool {
        if !self.ensure_connected("insert into", table).await {
            return false;
        }
        let Some(handle) = self.handle.as_mut() else {
            return false;
        };

        tracing::debug!(table, "Preparing insert");
        match handle.execute_with(&insert_sql(table), &[name, email]).await {
            Ok(rows_affected) if rows_affected > 0 => {
                tracing::info!(table, rows_affected, "Row inserted");
                true
            }
            Ok(_) => {
                tracing::error!(table, "Insert failed, no rows were changed");
                false
            }
            Err(e) => {
                e.log(&format!("Failed to insert into table '{}'", table));
                false
            }
        }
    }

    /// Read every row of `table` as typed records.
    pub async fn fetch_records(&mut self, table: &str) -> Result<Vec<Record>, DbError> {
        let handle = self.get_connection().await?;
        let sql = select_sql(table);

        let mut records = Vec::new();
        let mut rows = handle.stream_records(&sql);
        while let Some(row) = rows.next().await {
            records.push(row?);
        }
        Ok(records)
    }

    async fn ensure_connected(&mut self, action: &str, table: &str) -> bool {
        if self.is_connected().await {
            return true;
        }
        tracing::error!(table, error = %DbError::NotConnected, "Cannot {} table", action);
        false
    }

    async fn write_rows(
        out: &mut (dyn Write + Send),
        table: &str,
        rows: &mut (impl futures::Stream<Item = Result<Record, DriverError>> + Unpin),
    ) -> Result<usize, SelectError> {
        // Nothing is written until the query has produced its first result.
        let first = rows.next().await.transpose()?;
        writeln!(out, "--- Results for table: {} ---", table)?;

        let mut count = 0;
        if let Some(record) = first {
            writeln!(out, "{}", record)?;
            count += 1;
            while let Some(row) = rows.next().await {
                writeln!(out, "{}", row?)?;
                count += 1;
            }
        } else {
            writeln!(out, "No records found in table.")?;
        }
        writeln!(out, "----------------------------------------")?;
        out.flush()?;
        Ok(count)
    }
}

enum SelectError {
    Driver(DriverError),
    Output(io::Error),
}

impl From<DriverError> for SelectError {
    fn from(err: DriverError) -> Self {
        Self::Driver(err)
    }
}

impl From<io::Error> for SelectError {
    fn from(err: io::Error) -> Self {
        Self::Output(err)
    }
}
