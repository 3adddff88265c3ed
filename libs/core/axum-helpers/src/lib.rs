//! # Axum Helpers
//!
//! Shared HTTP plumbing for the task and account services.
//!
//! - **[`server`]**: router assembly, health checks, the lifecycle controller
//! - **[`errors`]**: the JSON error envelope and its codes
//! - **[`extractors`]**: UUID path and validated JSON extractors
//!
//! ## Quick Start
//!
//! ```ignore
//! use axum::Router;
//! use axum_helpers::server::{create_router, health_router, serve_app};
//! use core_config::{app_info, server::ServerConfig, FromEnv};
//!
//! let router = create_router::<ApiDoc>(Router::new().nest("/v1", api_routes))
//!     .merge(health_router(app_info!()));
//!
//! serve_app(router, &ServerConfig::from_env()?).await?;
//! ```

pub mod errors;
pub mod extractors;
pub mod server;

pub use errors::{AppError, ErrorCode, ErrorResponse};
pub use extractors::{UuidPath, ValidatedJson};
pub use server::{
    Acceptor, HealthCheckFuture, HealthResponse, LifecycleConfig, LifecycleController, LifecycleState,
    ServerError, ShutdownCoordinator, create_router, health_router, run_health_checks, serve_app,
};
