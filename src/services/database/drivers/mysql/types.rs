//! MySQL conversion utilities.
//!
//! This module turns the configured endpoint into SQLx connect options and
//! decodes result rows into `Record`s.

use sqlx::mysql::{MySqlConnectOptions, MySqlRow, MySqlSslMode};
use sqlx::{ConnectOptions, Row};
use url::Url;

use crate::services::database::error::DriverError;
use crate::services::database::traits::{ConnectionConfig, Record};

/// Converter between the wrapper's types and SQLx's MySQL types.
pub struct MySqlValueConverter;

impl MySqlValueConverter {
    /// Build connect options from the configuration.
    ///
    /// Accepts `mysql://` and `mariadb://` URLs, optionally prefixed with
    /// `jdbc:`. The configured user and secret replace any credentials in
    /// the URL. A JDBC-style `useSSL` query flag is honored.
    pub fn connect_options(config: &ConnectionConfig) -> Result<MySqlConnectOptions, DriverError> {
        let raw = config.endpoint().trim();
        let raw = raw.strip_prefix("jdbc:").unwrap_or(raw);

        let url = Url::parse(raw)
            .map_err(|e| DriverError::new(format!("invalid endpoint URL '{}': {}", raw, e)))?;

        match url.scheme() {
            "mysql" | "mariadb" => {}
            other => {
                return Err(DriverError::new(format!(
                    "unsupported endpoint scheme '{}', expected mysql://",
                    other
                )));
            }
        }

        let mut options = MySqlConnectOptions::from_url(&url)?
            .username(config.user())
            .password(config.secret());

        if let Some(ssl_mode) = Self::map_use_ssl(&url) {
            options = options.ssl_mode(ssl_mode);
        }

        Ok(options)
    }

    /// Map a JDBC `useSSL=true|false` query parameter to an SSL mode.
    pub fn map_use_ssl(url: &Url) -> Option<MySqlSslMode> {
        url.query_pairs()
            .find(|(key, _)| key.eq_ignore_ascii_case("useSSL"))
            .and_then(|(_, value)| match value.to_ascii_lowercase().as_str() {
                "true" => Some(MySqlSslMode::Required),
                "false" => Some(MySqlSslMode::Disabled),
                _ => None,
            })
    }

    /// Decode one row of the `id, nome, email` projection.
    pub fn convert_row(row: &MySqlRow) -> Result<Record, sqlx::Error> {
        Ok(Record {
            id: row.try_get("id")?,
            name: row.try_get("nome")?,
            email: row.try_get("email")?,
        })
    }
}
