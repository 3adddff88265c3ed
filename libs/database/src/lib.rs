//! Connection pool management for the task store.
//!
//! # Features
//!
//! - `postgres` (default) - PostgreSQL pool built on SeaORM
//! - `config` - `core_config::FromEnv` support for [`postgres::PostgresConfig`]
//! - `all` - everything above
//!
//! # Example
//!
//! ```ignore
//! use core_config::FromEnv;
//! use database::common::RetryConfig;
//! use database::postgres::{self, PostgresConfig};
//!
//! let config = PostgresConfig::from_env()?;
//! let db = postgres::connect_from_config_with_retry(config, RetryConfig::default()).await?;
//! postgres::check_health(&db).await?;
//! ```

pub mod common;

#[cfg(feature = "postgres")]
pub mod postgres;

pub use common::{DatabaseError, DatabaseResult};
