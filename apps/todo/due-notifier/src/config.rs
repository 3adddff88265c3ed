//! Configuration for the due notifier

use core_config::{ConfigError, Environment, FromEnv, env_parse};
use database::postgres::PostgresConfig;
use domain_tasks::DEFAULT_DUE_WINDOW_MINUTES;

#[derive(Debug, Clone)]
pub struct Config {
    pub environment: Environment,
    pub database: PostgresConfig,
    /// Window used when `--window-minutes` is not given
    pub window_minutes: i64,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            environment: Environment::from_env(),
            database: PostgresConfig::from_env()?,
            window_minutes: env_parse("DUE_WINDOW_MINUTES", &DEFAULT_DUE_WINDOW_MINUTES.to_string())?,
        })
    }
}
