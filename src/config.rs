//! Startup configuration.
//!
//! Values come from the process environment, optionally seeded from a
//! `.env` file in the working directory.

use std::env;

use crate::services::database::{ConnectionConfig, DbError};

/// Environment variable holding the server URL.
pub const URL_VAR: &str = "URL_JDBC";
/// Environment variable holding the username.
pub const USER_VAR: &str = "USER_JDBC";
/// Environment variable holding the password.
pub const PASSWORD_VAR: &str = "PASSWORD_JDBC";

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

/// Configuration assembled once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub connection: ConnectionConfig,
}

impl AppConfig {
    /// Build config from environment variables, loading `.env` first.
    pub fn from_env() -> Result<Self, DbError> {
        load_dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, DbError> {
        let require = |key: &str| {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .ok_or_else(|| DbError::Validation(format!("{} is not set", key)))
        };

        let connection = ConnectionConfig::new(
            require(URL_VAR)?,
            require(USER_VAR)?,
            require(PASSWORD_VAR)?,
        )?;

        Ok(Self { connection })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_from_lookup() {
        let config = AppConfig::from_lookup(lookup_from(&[
            (URL_VAR, "jdbc:mysql://localhost:3306/app"),
            (USER_VAR, "root"),
            (PASSWORD_VAR, "password"),
        ]))
        .unwrap();

        assert_eq!(
            config.connection.endpoint(),
            "jdbc:mysql://localhost:3306/app"
        );
        assert_eq!(config.connection.user(), "root");
    }

    #[test]
    fn test_missing_variable_is_named() {
        let err = AppConfig::from_lookup(lookup_from(&[
            (URL_VAR, "mysql://localhost/app"),
            (USER_VAR, "root"),
        ]))
        .unwrap_err();

        assert!(matches!(err, DbError::Validation(_)));
        assert!(err.to_string().contains(PASSWORD_VAR));
    }

    #[test]
    fn test_empty_variable_is_rejected() {
        let err = AppConfig::from_lookup(lookup_from(&[
            (URL_VAR, "mysql://localhost/app"),
            (USER_VAR, ""),
            (PASSWORD_VAR, "password"),
        ]))
        .unwrap_err();

        assert!(err.to_string().contains(USER_VAR));
    }
}
