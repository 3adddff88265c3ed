use axum::{Router, routing::get};
use domain_accounts::{AccountService, PgAccountRepository};
use domain_tasks::{PgTaskRepository, TaskService};

use crate::state::AppState;

pub mod health;

/// Versioned resource routes. Every repository shares the one pool in `state`.
pub fn routes(state: &AppState) -> Router {
    let tasks = TaskService::new(PgTaskRepository::new(state.db.clone()));
    let accounts = AccountService::new(PgAccountRepository::new(state.db.clone()));

    Router::new().nest(
        "/v1",
        Router::new()
            .nest("/tasks", domain_tasks::handlers::router(tasks))
            .nest("/accounts", domain_accounts::handlers::router(accounts)),
    )
}

/// `/ready` pings the pool; merged beside the stateless app router.
pub fn ready_router(state: AppState) -> Router {
    Router::new()
        .route("/ready", get(health::ready_handler))
        .with_state(state)
}
