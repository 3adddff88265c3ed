use async_trait::async_trait;
use uuid::Uuid;

use crate::error::AccountResult;
use crate::models::{Account, CreateAccount};

/// Repository trait for Account persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountRepository: Send + Sync {
    async fn create(&self, input: CreateAccount) -> AccountResult<Account>;

    /// `NotFound` when no row matches
    async fn get_by_id(&self, id: Uuid) -> AccountResult<Account>;

    /// Newest first, at most `limit` rows
    async fn list(&self, limit: i64) -> AccountResult<Vec<Account>>;

    /// `NotFound` when nothing was deleted. Owned tasks are not removed.
    async fn delete(&self, id: Uuid) -> AccountResult<()>;

    /// Refresh the activity marker. Succeeds even if the row no longer exists.
    async fn touch(&self, id: Uuid) -> AccountResult<()>;
}
