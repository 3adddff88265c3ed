use super::lifecycle::{LifecycleConfig, LifecycleController, ServerError};
use super::shutdown::ShutdownCoordinator;
use crate::errors::handlers::{method_not_allowed, not_found};
use axum::{Json, Router, http::StatusCode, routing::get};
use core_config::server::ServerConfig;
use std::time::Duration;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;
use utoipa::OpenApi;

/// Per-request deadline. Dropping the handler future on expiry also drops
/// any statement it was awaiting.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Wrap application routes with the OpenAPI document, the 404 fallback,
/// request tracing and the request deadline.
///
/// `apis` should already carry its state and path prefixes. Health routes
/// are merged by the caller.
///
/// ```ignore
/// #[derive(OpenApi)]
/// #[openapi(paths(/* ... */))]
/// struct ApiDoc;
///
/// let router = create_router::<ApiDoc>(Router::new().nest("/v1", api_routes));
/// ```
pub fn create_router<T>(apis: Router) -> Router
where
    T: OpenApi + 'static,
{
    Router::new()
        .route("/api-docs/openapi.json", get(|| async { Json(T::openapi()) }))
        .merge(apis)
        .fallback(not_found)
        .method_not_allowed_fallback(method_not_allowed)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            REQUEST_TIMEOUT,
        ))
}

/// Serve `router` on the configured address until SIGINT/SIGTERM, then
/// drain within the configured shutdown timeout.
pub async fn serve_app(router: Router, server_config: &ServerConfig) -> Result<(), ServerError> {
    let coordinator = ShutdownCoordinator::new();
    let signals = coordinator.clone();
    tokio::spawn(async move { signals.wait_for_signal().await });

    let controller = LifecycleController::new(LifecycleConfig::from(server_config));
    controller
        .run(router, &server_config.address(), coordinator.cancelled())
        .await
}
