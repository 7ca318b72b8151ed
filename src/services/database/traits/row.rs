//! Row type for the users table.
//!
//! A `Record` is one row of the fixed `id, nome, email` projection. Records are
//! created by `insert`, read by `select`, and never updated or deleted.

use serde::{Deserialize, Serialize};

/// A single user row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Auto-increment primary key
    pub id: i32,
    /// Value of the `nome` column
    pub name: String,
    /// Value of the `email` column (unique)
    pub email: String,
}

impl Record {
    /// Create a new record
    pub fn new(id: i32, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
        }
    }
}

impl std::fmt::Display for Record {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ID: {:<5} | Name: {:<20} | Email: {}",
            self.id, self.name, self.email
        )
    }
}
