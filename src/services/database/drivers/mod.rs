//! Database driver implementations.
//!
//! - **MySQL**: MySQL/MariaDB support via SQLx
//!
//! Each driver implements the `Driver` and `DriverHandle` traits, and
//! provides a connection type implementing `DatabaseConnection`.

pub mod mysql;

#[cfg(test)]
pub(crate) mod memory;

pub use mysql::{MySqlConnection, MySqlDriver};
