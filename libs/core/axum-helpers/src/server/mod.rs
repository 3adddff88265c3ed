//! HTTP server infrastructure.
//!
//! - [`app`]: router assembly and the signal-driven entry point
//! - [`lifecycle`]: listener ownership, accept loop, bounded drain
//! - [`health`]: liveness and readiness endpoints
//! - [`shutdown`]: signal to cancellation bridging

pub mod app;
pub mod health;
pub mod lifecycle;
pub mod shutdown;

pub use app::{REQUEST_TIMEOUT, create_router, serve_app};
pub use health::{HealthCheckFuture, HealthResponse, health_router, run_health_checks};
pub use lifecycle::{
    ACCEPT_BACKOFF, Acceptor, HEADER_READ_TIMEOUT, LifecycleConfig, LifecycleController,
    LifecycleState, ServerError,
};
pub use shutdown::ShutdownCoordinator;
