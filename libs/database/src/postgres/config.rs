use sea_orm::ConnectOptions;
use std::time::Duration;
use tracing::log::LevelFilter;

#[cfg(feature = "config")]
use core_config::{env_parse, env_required, ConfigError, FromEnv};

/// PostgreSQL pool settings.
///
/// Build it by hand with [`PostgresConfig::new`] or, with the `config`
/// feature, load it from the environment via `FromEnv`.
#[derive(Clone, Debug)]
pub struct PostgresConfig {
    /// Connection string (required)
    pub url: String,

    /// Ceiling on concurrently checked-out connections
    pub max_connections: u32,

    pub min_connections: u32,

    pub connect_timeout_secs: u64,

    /// How long an operation waits for a free connection once the ceiling is hit
    pub acquire_timeout_secs: u64,

    /// Log every statement through sqlx
    pub sqlx_logging: bool,
}

impl PostgresConfig {
    pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;
    pub const DEFAULT_MIN_CONNECTIONS: u32 = 1;
    pub const DEFAULT_TIMEOUT_SECS: u64 = 5;

    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn with_pool_size(mut self, max_connections: u32, min_connections: u32) -> Self {
        self.max_connections = max_connections;
        self.min_connections = min_connections;
        self
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Convert into SeaORM connect options.
    pub fn into_connect_options(self) -> ConnectOptions {
        let mut opt = ConnectOptions::new(&self.url);
        opt.max_connections(self.max_connections)
            .min_connections(self.min_connections.min(self.max_connections))
            .connect_timeout(Duration::from_secs(self.connect_timeout_secs))
            .acquire_timeout(Duration::from_secs(self.acquire_timeout_secs))
            .sqlx_logging(self.sqlx_logging)
            .sqlx_logging_level(LevelFilter::Debug);
        opt
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: Self::DEFAULT_MAX_CONNECTIONS,
            min_connections: Self::DEFAULT_MIN_CONNECTIONS,
            connect_timeout_secs: Self::DEFAULT_TIMEOUT_SECS,
            acquire_timeout_secs: Self::DEFAULT_TIMEOUT_SECS,
            sqlx_logging: false,
        }
    }
}

/// Environment variables:
/// - `DATABASE_URL` (required)
/// - `DB_MAX_CONNECTIONS` (default: 10)
/// - `DB_MIN_CONNECTIONS` (default: 1)
/// - `DB_CONNECT_TIMEOUT_SECS` (default: 5)
/// - `DB_ACQUIRE_TIMEOUT_SECS` (default: 5)
/// - `DB_SQLX_LOGGING` (default: false)
#[cfg(feature = "config")]
impl FromEnv for PostgresConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let timeout_default = Self::DEFAULT_TIMEOUT_SECS.to_string();

        Ok(Self {
            url: env_required("DATABASE_URL")?,
            max_connections: env_parse(
                "DB_MAX_CONNECTIONS",
                &Self::DEFAULT_MAX_CONNECTIONS.to_string(),
            )?,
            min_connections: env_parse(
                "DB_MIN_CONNECTIONS",
                &Self::DEFAULT_MIN_CONNECTIONS.to_string(),
            )?,
            connect_timeout_secs: env_parse("DB_CONNECT_TIMEOUT_SECS", &timeout_default)?,
            acquire_timeout_secs: env_parse("DB_ACQUIRE_TIMEOUT_SECS", &timeout_default)?,
            sqlx_logging: env_parse("DB_SQLX_LOGGING", "false")?,
        })
    }
}
