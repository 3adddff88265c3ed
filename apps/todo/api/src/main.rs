use axum_helpers::{health_router, serve_app};
use core_config::tracing::{init_tracing, install_color_eyre};
use database::common::RetryConfig;
use tracing::info;

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    let db = database::postgres::connect_from_config_with_retry(
        config.database.clone(),
        RetryConfig::default(),
    )
    .await
    .map_err(|e| eyre::eyre!("PostgreSQL connection failed: {}", e))?;

    let state = AppState { config, db };

    let router = axum_helpers::create_router::<openapi::ApiDoc>(api::routes(&state));

    // /health: liveness with app name/version, /ready: pool ping
    let app = router
        .merge(health_router(state.config.app))
        .merge(api::ready_router(state.clone()));

    info!(
        address = %state.config.server.address(),
        shutdown_timeout_secs = state.config.server.shutdown_timeout_secs,
        "Starting todo API"
    );

    let served = serve_app(app, &state.config.server).await;

    match state.db.close().await {
        Ok(()) => info!("PostgreSQL connection closed"),
        Err(e) => tracing::error!("Error closing PostgreSQL: {}", e),
    }

    served.map_err(|e| eyre::eyre!("Server error: {}", e))?;
    info!("Todo API shutdown complete");
    Ok(())
}
