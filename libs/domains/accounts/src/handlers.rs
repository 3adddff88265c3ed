use axum::{
    Json, Router,
    extract::{Query, State, rejection::QueryRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use axum_helpers::{AppError, UuidPath, ValidatedJson};
use std::sync::Arc;
use utoipa::OpenApi;
use uuid::Uuid;

use crate::error::AccountResult;
use crate::models::{Account, AccountListQuery, CreateAccount};
use crate::repository::AccountRepository;
use crate::service::AccountService;

#[derive(OpenApi)]
#[openapi(
    paths(list_accounts, get_account, create_account, delete_account),
    components(schemas(Account, CreateAccount)),
    tags((name = "accounts", description = "Account management"))
)]
pub struct AccountsApiDoc;

pub fn router<R: AccountRepository + 'static>(service: AccountService<R>) -> Router {
    Router::new()
        .route("/", get(list_accounts::<R>).post(create_account::<R>))
        .route("/{id}", get(get_account::<R>).delete(delete_account::<R>))
        .with_state(Arc::new(service))
}

#[utoipa::path(
    get,
    path = "/accounts",
    tag = "accounts",
    params(AccountListQuery),
    responses(
        (status = 200, description = "Newest accounts first", body = Vec<Account>),
        (status = 400, description = "Malformed limit")
    )
)]
pub async fn list_accounts<R: AccountRepository>(
    State(service): State<Arc<AccountService<R>>>,
    query: Result<Query<AccountListQuery>, QueryRejection>,
) -> Result<Json<Vec<Account>>, AppError> {
    let Query(query) = query.map_err(|e| AppError::BadRequest(e.body_text()))?;
    Ok(Json(service.list_accounts(query.limit).await?))
}

#[utoipa::path(
    get,
    path = "/accounts/{id}",
    tag = "accounts",
    params(("id" = Uuid, Path, description = "Account ID")),
    responses(
        (status = 200, description = "Account found", body = Account),
        (status = 404, description = "Account not found")
    )
)]
pub async fn get_account<R: AccountRepository>(
    State(service): State<Arc<AccountService<R>>>,
    UuidPath(id): UuidPath,
) -> AccountResult<Json<Account>> {
    Ok(Json(service.get_account(id).await?))
}

#[utoipa::path(
    post,
    path = "/accounts",
    tag = "accounts",
    request_body = CreateAccount,
    responses(
        (status = 201, description = "Account created", body = Account),
        (status = 400, description = "Invalid request")
    )
)]
pub async fn create_account<R: AccountRepository>(
    State(service): State<Arc<AccountService<R>>>,
    ValidatedJson(input): ValidatedJson<CreateAccount>,
) -> AccountResult<impl IntoResponse> {
    let account = service.create_account(input).await?;
    Ok((StatusCode::CREATED, Json(account)))
}

/// Delete an account; its tasks are kept
#[utoipa::path(
    delete,
    path = "/accounts/{id}",
    tag = "accounts",
    params(("id" = Uuid, Path, description = "Account ID")),
    responses(
        (status = 204, description = "Account deleted"),
        (status = 404, description = "Account not found")
    )
)]
pub async fn delete_account<R: AccountRepository>(
    State(service): State<Arc<AccountService<R>>>,
    UuidPath(id): UuidPath,
) -> AccountResult<StatusCode> {
    service.delete_account(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
