//! Connection configuration.
//!
//! `ConnectionConfig` carries the three values needed to reach the server:
//! an endpoint URL, a username and a secret. It is validated once when built
//! and cannot be changed afterwards.

use serde::{Deserialize, Serialize};

use crate::services::database::error::DbError;

/// Endpoint and credentials for a single database connection.
///
/// Deserializing runs the same validation as `new`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawConnectionConfig")]
pub struct ConnectionConfig {
    /// Server URL, e.g. `mysql://localhost:3306/app`
    endpoint: String,
    /// Username for authentication
    user: String,
    /// Password for authentication
    #[serde(skip_serializing)]
    secret: String,
}

/// Unvalidated form used only while deserializing.
#[derive(Deserialize)]
struct RawConnectionConfig {
    #[serde(default)]
    endpoint: String,
    #[serde(default)]
    user: String,
    #[serde(default)]
    secret: String,
}

impl TryFrom<RawConnectionConfig> for ConnectionConfig {
    type Error = DbError;

    fn try_from(raw: RawConnectionConfig) -> Result<Self, Self::Error> {
        Self::new(raw.endpoint, raw.user, raw.secret)
    }
}

impl ConnectionConfig {
    /// Create a new connection configuration.
    ///
    /// # Errors
    ///
    /// Returns `DbError::Validation` if any of the three values is empty.
    pub fn new(
        endpoint: impl Into<String>,
        user: impl Into<String>,
        secret: impl Into<String>,
    ) -> Result<Self, DbError> {
        let config = Self {
            endpoint: endpoint.into(),
            user: user.into(),
            secret: secret.into(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Check that endpoint, user and secret are all present.
    pub fn validate(&self) -> Result<(), DbError> {
        let missing: Vec<&str> = [
            ("endpoint", &self.endpoint),
            ("user", &self.user),
            ("secret", &self.secret),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
        .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(DbError::Validation(format!(
                "endpoint, user and secret cannot be empty (missing: {})",
                missing.join(", ")
            )))
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }
}

impl std::fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("endpoint", &self.endpoint)
            .field("user", &self.user)
            .field("secret", &"<redacted>")
            .finish()
    }
}
