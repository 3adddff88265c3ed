use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::error::AccountResult;
use crate::models::{Account, CreateAccount, normalize_limit};
use crate::repository::AccountRepository;

/// Service layer for Account business logic
pub struct AccountService<R: AccountRepository> {
    repository: Arc<R>,
}

impl<R: AccountRepository> Clone for AccountService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R: AccountRepository> AccountService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    #[instrument(skip(self, input))]
    pub async fn create_account(&self, input: CreateAccount) -> AccountResult<Account> {
        input.validate()?;
        self.repository.create(input).await
    }

    #[instrument(skip(self))]
    pub async fn get_account(&self, id: Uuid) -> AccountResult<Account> {
        self.repository.get_by_id(id).await
    }

    #[instrument(skip(self))]
    pub async fn list_accounts(&self, limit: Option<i64>) -> AccountResult<Vec<Account>> {
        self.repository.list(normalize_limit(limit)).await
    }

    #[instrument(skip(self))]
    pub async fn delete_account(&self, id: Uuid) -> AccountResult<()> {
        self.repository.delete(id).await
    }

    #[instrument(skip(self))]
    pub async fn touch_account(&self, id: Uuid) -> AccountResult<()> {
        self.repository.touch(id).await
    }
}
