use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{ConnectionTrait, DatabaseConnection, DbBackend, FromQueryResult, Statement};
use uuid::Uuid;

use crate::{
    error::{AccountError, AccountResult},
    models::{Account, CreateAccount},
    repository::AccountRepository,
};

const ACCOUNT_COLUMNS: &str = "id, name, email, created_at, updated_at";

/// PostgreSQL implementation of [`AccountRepository`]
#[derive(Clone)]
pub struct PgAccountRepository {
    db: DatabaseConnection,
}

impl PgAccountRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// Helper struct for deserializing account rows
#[derive(Debug, FromQueryResult)]
struct AccountRow {
    id: Uuid,
    name: String,
    email: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<AccountRow> for Account {
    fn from(row: AccountRow) -> Self {
        Account {
            id: row.id,
            name: row.name,
            email: row.email,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl AccountRepository for PgAccountRepository {
    async fn create(&self, input: CreateAccount) -> AccountResult<Account> {
        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            format!("INSERT INTO accounts (id, name, email) VALUES ($1, $2, $3) RETURNING {ACCOUNT_COLUMNS}"),
            [Uuid::now_v7().into(), input.name.into(), input.email.into()],
        );

        let account: Account = AccountRow::find_by_statement(stmt)
            .one(&self.db)
            .await?
            .ok_or_else(|| AccountError::Database("insert returned no row".to_string()))?
            .into();

        tracing::info!(account_id = %account.id, "Created account");
        Ok(account)
    }

    async fn get_by_id(&self, id: Uuid) -> AccountResult<Account> {
        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = $1"),
            [id.into()],
        );

        AccountRow::find_by_statement(stmt)
            .one(&self.db)
            .await?
            .map(Account::from)
            .ok_or(AccountError::NotFound(id))
    }

    async fn list(&self, limit: i64) -> AccountResult<Vec<Account>> {
        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            format!("SELECT {ACCOUNT_COLUMNS} FROM accounts ORDER BY created_at DESC LIMIT $1"),
            [limit.into()],
        );

        let rows = AccountRow::find_by_statement(stmt).all(&self.db).await?;
        Ok(rows.into_iter().map(Account::from).collect())
    }

    async fn delete(&self, id: Uuid) -> AccountResult<()> {
        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            "DELETE FROM accounts WHERE id = $1",
            [id.into()],
        );

        if self.db.execute_raw(stmt).await?.rows_affected() == 0 {
            return Err(AccountError::NotFound(id));
        }

        tracing::info!(account_id = %id, "Deleted account");
        Ok(())
    }

    async fn touch(&self, id: Uuid) -> AccountResult<()> {
        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            "UPDATE accounts SET updated_at = $2 WHERE id = $1",
            [id.into(), Utc::now().into()],
        );

        // No affected-row check: a vanished account is not an error here.
        self.db.execute_raw(stmt).await?;
        Ok(())
    }
}
