//! Database abstraction traits and types.
//!
//! - **Types** (`types`): connection configuration
//! - **Row** (`row`): the `Record` row type
//! - **Connection** (`connection`): driver traits and the connection contract
//!
//! # Example
//!
//! ```ignore
//! use mysql_users::services::database::traits::ConnectionConfig;
//!
//! let config = ConnectionConfig::new(
//!     "mysql://localhost:3306/app",
//!     "user",
//!     "password",
//! )?;
//! ```

pub mod connection;
pub mod row;
pub mod types;

// Re-export commonly used types
pub use connection::{BoxedHandle, DatabaseConnection, Driver, DriverHandle};

pub use row::Record;

pub use types::ConnectionConfig;
