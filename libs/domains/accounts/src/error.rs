use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum AccountError {
    #[error("Account not found: {0}")]
    NotFound(Uuid),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),
}

pub type AccountResult<T> = Result<T, AccountError>;

impl From<AccountError> for AppError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::NotFound(id) => AppError::NotFound(format!("Account {} not found", id)),
            AccountError::Validation(msg) => AppError::BadRequest(msg),
            AccountError::Database(msg) => AppError::Database(msg),
        }
    }
}

impl IntoResponse for AccountError {
    fn into_response(self) -> Response {
        AppError::from(self).into_response()
    }
}

impl From<sea_orm::DbErr> for AccountError {
    fn from(err: sea_orm::DbErr) -> Self {
        AccountError::Database(err.to_string())
    }
}

impl From<validator::ValidationErrors> for AccountError {
    fn from(err: validator::ValidationErrors) -> Self {
        AccountError::Validation(err.to_string())
    }
}
