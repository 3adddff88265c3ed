//! Readiness check against the connection pool.

use crate::state::AppState;
use axum::{Json, extract::State, http::StatusCode};
use axum_helpers::{HealthCheckFuture, run_health_checks};
use serde_json::Value;

pub async fn ready_handler(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let checks: Vec<(&str, HealthCheckFuture<'_>)> = vec![(
        "database",
        Box::pin(async {
            database::postgres::check_health(&state.db)
                .await
                .map_err(|e| e.to_string())
        }),
    )];

    run_health_checks(checks).await
}
