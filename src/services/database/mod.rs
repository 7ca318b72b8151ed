mod base;
mod error;

pub mod drivers;
pub mod traits;

pub use base::{ConnectionBase, USERS_TABLE, create_table_sql, insert_sql, select_sql};
pub use drivers::{MySqlConnection, MySqlDriver};
pub use error::{DbError, DriverError};
pub use traits::{ConnectionConfig, DatabaseConnection, Record};
