use anyhow::Result;
use mysql_users::config::AppConfig;
use mysql_users::services::database::{DatabaseConnection, MySqlConnection};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env()?;

    smol::block_on(async {
        let mut conn = MySqlConnection::new(config.connection);
        conn.connect().await?;
        tracing::info!(connection = %conn.display_name(), "Database ready");
        conn.disconnect().await;
        Ok::<(), anyhow::Error>(())
    })
}
