use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

/// Cap applied to account listings when the caller gives none
pub const DEFAULT_LIST_LIMIT: i64 = 100;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Account {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    /// Last activity, refreshed by touch
    pub updated_at: DateTime<Utc>,
}

/// DTO for creating a new account
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateAccount {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(email)]
    pub email: String,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AccountListQuery {
    /// Maximum number of accounts to return (default 100)
    pub limit: Option<i64>,
}

pub fn normalize_limit(limit: Option<i64>) -> i64 {
    match limit {
        Some(limit) if limit > 0 => limit,
        _ => DEFAULT_LIST_LIMIT,
    }
}
