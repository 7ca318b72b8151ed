//! MySQL database driver implementation.
//!
//! This module provides a MySQL driver that implements the `Driver`,
//! `DriverHandle` and `DatabaseConnection` traits using SQLx.
//!
//! # Example
//!
//! ```ignore
//! use mysql_users::services::database::drivers::mysql::MySqlConnection;
//! use mysql_users::services::database::traits::{ConnectionConfig, DatabaseConnection};
//!
//! let config = ConnectionConfig::new("mysql://localhost:3306/app", "user", "password")?;
//!
//! let mut conn = MySqlConnection::new(config);
//! conn.connect().await?;
//! ```

mod connection;
mod types;

pub use connection::{MySqlConnection, MySqlDriver, MySqlHandle};
pub use types::MySqlValueConverter;
