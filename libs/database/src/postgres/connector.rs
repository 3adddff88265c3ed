use sea_orm::{Database, DatabaseConnection, DbErr};
use tracing::info;

use super::PostgresConfig;
use crate::common::{retry_with_backoff, RetryConfig};

/// Open a pool and verify it with a ping bounded by the connect timeout.
pub async fn connect_from_config(config: PostgresConfig) -> Result<DatabaseConnection, DbErr> {
    let ping_timeout = config.connect_timeout();
    let max_connections = config.max_connections;

    let db = Database::connect(config.into_connect_options()).await?;

    match tokio::time::timeout(ping_timeout, db.ping()).await {
        Ok(result) => result?,
        Err(_) => {
            return Err(DbErr::Conn(sea_orm::RuntimeErr::Internal(format!(
                "ping did not complete within {ping_timeout:?}"
            ))));
        }
    }

    info!(max_connections, "Connected to PostgreSQL");
    Ok(db)
}

/// [`connect_from_config`] with exponential backoff between attempts.
///
/// ```ignore
/// let db = connect_from_config_with_retry(
///     PostgresConfig::from_env()?,
///     RetryConfig::new().with_max_retries(5),
/// )
/// .await?;
/// ```
pub async fn connect_from_config_with_retry(
    config: PostgresConfig,
    retry: RetryConfig,
) -> Result<DatabaseConnection, DbErr> {
    retry_with_backoff(|| connect_from_config(config.clone()), retry).await
}
