use async_trait::async_trait;
use chrono::{TimeDelta, Utc};
use sea_orm::{ConnectionTrait, DatabaseConnection, DbBackend, EntityTrait, Statement};
use uuid::Uuid;

use crate::{
    entity,
    error::{TaskError, TaskResult},
    models::{CreateTask, Task, UpdateTask},
    repository::TaskRepository,
    update_builder::build_update,
};

/// Column list shared by every statement that returns task rows
pub(crate) const TASK_COLUMNS: &str =
    "id, account_id, title, description, due_date, completed, created_at, updated_at";

/// PostgreSQL implementation of [`TaskRepository`] using raw statements.
///
/// Every operation issues exactly one statement and never retries.
#[derive(Clone)]
pub struct PgTaskRepository {
    db: DatabaseConnection,
}

impl PgTaskRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn fetch_one(&self, stmt: Statement) -> TaskResult<Option<Task>> {
        let row = entity::Entity::find()
            .from_raw_sql(stmt)
            .one(&self.db)
            .await?;
        Ok(row.map(Task::from))
    }

    async fn fetch_all(&self, stmt: Statement) -> TaskResult<Vec<Task>> {
        let rows = entity::Entity::find().from_raw_sql(stmt).all(&self.db).await?;
        Ok(rows.into_iter().map(Task::from).collect())
    }
}

#[async_trait]
impl TaskRepository for PgTaskRepository {
    async fn create(&self, input: CreateTask) -> TaskResult<Task> {
        let sql = format!(
            "INSERT INTO tasks (id, account_id, title, description, due_date) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {TASK_COLUMNS}"
        );

        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            sql,
            [
                Uuid::now_v7().into(),
                input.account_id.into(),
                input.title.into(),
                input.description.into(),
                input.due_date.into(),
            ],
        );

        let task = self
            .fetch_one(stmt)
            .await?
            .ok_or_else(|| TaskError::Database("insert returned no row".to_string()))?;

        tracing::info!(task_id = %task.id, account_id = %task.account_id, "Created task");
        Ok(task)
    }

    async fn get(&self, id: Uuid) -> TaskResult<Task> {
        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = $1"),
            [id.into()],
        );

        self.fetch_one(stmt).await?.ok_or(TaskError::NotFound(id))
    }

    async fn list_by_account(&self, account_id: Uuid) -> TaskResult<Vec<Task>> {
        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            format!(
                "SELECT {TASK_COLUMNS} FROM tasks WHERE account_id = $1 \
                 ORDER BY created_at DESC"
            ),
            [account_id.into()],
        );

        self.fetch_all(stmt).await
    }

    async fn update(&self, id: Uuid, input: UpdateTask) -> TaskResult<Task> {
        input.ensure_due_date_exclusive()?;

        let Some(update) = build_update(id, &input) else {
            return self.get(id).await;
        };

        let task = self
            .fetch_one(update.into_statement())
            .await?
            .ok_or(TaskError::NotFound(id))?;

        tracing::info!(task_id = %id, "Updated task");
        Ok(task)
    }

    async fn delete(&self, id: Uuid) -> TaskResult<()> {
        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            "DELETE FROM tasks WHERE id = $1",
            [id.into()],
        );

        let result = self.db.execute_raw(stmt).await?;
        if result.rows_affected() == 0 {
            return Err(TaskError::NotFound(id));
        }

        tracing::info!(task_id = %id, "Deleted task");
        Ok(())
    }

    async fn list_due_within(&self, window: TimeDelta) -> TaskResult<Vec<Task>> {
        let deadline = Utc::now()
            .checked_add_signed(window)
            .ok_or_else(|| TaskError::Validation(format!("due window {window} is out of range")))?;

        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            format!(
                "SELECT {TASK_COLUMNS} FROM tasks \
                 WHERE completed = FALSE AND due_date IS NOT NULL AND due_date <= $1 \
                 ORDER BY due_date ASC"
            ),
            [deadline.into()],
        );

        self.fetch_all(stmt).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, FixedOffset, Duration};
    use sea_orm::sea_query::ValueType;
    use sea_orm::{DatabaseBackend, DbErr, MockDatabase, MockExecResult, Transaction};

    fn ts(offset_secs: i64) -> DateTime<FixedOffset> {
        (Utc::now() + Duration::seconds(offset_secs)).into()
    }

    fn row(title: &str) -> entity::Model {
        entity::Model {
            id: Uuid::now_v7(),
            account_id: Uuid::from_u128(7),
            title: title.to_string(),
            description: None,
            due_date: None,
            completed: false,
            created_at: ts(-60),
            updated_at: ts(-60),
        }
    }

    fn no_rows() -> Vec<entity::Model> {
        Vec::new()
    }

    fn affected(rows_affected: u64) -> MockExecResult {
        MockExecResult {
            last_insert_id: 0,
            rows_affected,
        }
    }

    fn single_statement(log: Vec<Transaction>) -> Statement {
        assert_eq!(log.len(), 1, "expected exactly one statement");
        let mut statements = log[0].statements().to_vec();
        assert_eq!(statements.len(), 1);
        statements.remove(0)
    }

    #[tokio::test]
    async fn test_create_generates_id_and_returns_stored_row() {
        let stored = row("Buy milk");
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![stored.clone()]])
            .into_connection();
        let repo = PgTaskRepository::new(db);

        let task = repo
            .create(CreateTask {
                account_id: stored.account_id,
                title: "Buy milk".into(),
                description: None,
                due_date: None,
            })
            .await
            .unwrap();

        assert_eq!(task, Task::from(stored));
        assert!(!task.completed);

        let stmt = single_statement(repo.db.into_transaction_log());
        assert!(stmt.sql.starts_with("INSERT INTO tasks"));
        let values = stmt.values.unwrap().0;
        assert_eq!(values.len(), 5);
        let id = <Uuid as ValueType>::try_from(values[0].clone()).unwrap();
        assert_eq!(id.get_version_num(), 7);
    }

    #[tokio::test]
    async fn test_create_surfaces_database_error() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_errors([DbErr::Custom("unique violation".into())])
            .into_connection();
        let repo = PgTaskRepository::new(db);

        let err = repo
            .create(CreateTask {
                account_id: Uuid::from_u128(7),
                title: "t".into(),
                description: None,
                due_date: None,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, TaskError::Database(msg) if msg.contains("unique violation")));
    }

    #[tokio::test]
    async fn test_get_maps_no_rows_to_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([no_rows()])
            .into_connection();
        let repo = PgTaskRepository::new(db);
        let id = Uuid::now_v7();

        let err = repo.get(id).await.unwrap_err();
        assert!(matches!(err, TaskError::NotFound(missing) if missing == id));
    }

    #[tokio::test]
    async fn test_get_other_failure_is_database_error() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_errors([DbErr::Custom("connection reset".into())])
            .into_connection();
        let repo = PgTaskRepository::new(db);

        let err = repo.get(Uuid::now_v7()).await.unwrap_err();
        assert!(matches!(err, TaskError::Database(_)));
    }

    #[tokio::test]
    async fn test_list_by_account_orders_newest_first() {
        let newer = row("newer");
        let older = entity::Model {
            created_at: ts(-3600),
            ..row("older")
        };
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![newer.clone(), older.clone()]])
            .into_connection();
        let repo = PgTaskRepository::new(db);

        let tasks = repo.list_by_account(newer.account_id).await.unwrap();
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].title, "newer");

        let stmt = single_statement(repo.db.into_transaction_log());
        assert!(stmt.sql.contains("WHERE account_id = $1"));
        assert!(stmt.sql.ends_with("ORDER BY created_at DESC"));
    }

    #[tokio::test]
    async fn test_list_by_account_empty_is_ok() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([no_rows()])
            .into_connection();
        let repo = PgTaskRepository::new(db);

        assert!(repo.list_by_account(Uuid::now_v7()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_returns_row_in_single_round_trip() {
        let existing = row("Buy milk");
        let updated = entity::Model {
            completed: true,
            updated_at: ts(0),
            ..existing.clone()
        };
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![updated]])
            .into_connection();
        let repo = PgTaskRepository::new(db);

        let task = repo.update(existing.id, UpdateTask::complete()).await.unwrap();
        assert!(task.completed);
        assert_eq!(task.title, "Buy milk");
        assert!(task.updated_at > task.created_at);

        let stmt = single_statement(repo.db.into_transaction_log());
        assert!(stmt.sql.starts_with("UPDATE tasks SET completed = $1, updated_at = now()"));
        assert!(stmt.sql.contains("RETURNING"));
    }

    #[tokio::test]
    async fn test_update_missing_row_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([no_rows()])
            .into_connection();
        let repo = PgTaskRepository::new(db);
        let id = Uuid::now_v7();

        let err = repo.update(id, UpdateTask::complete()).await.unwrap_err();
        assert!(matches!(err, TaskError::NotFound(missing) if missing == id));
    }

    #[tokio::test]
    async fn test_empty_update_falls_through_to_get() {
        let existing = row("unchanged");
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![existing.clone()]])
            .into_connection();
        let repo = PgTaskRepository::new(db);

        let task = repo.update(existing.id, UpdateTask::default()).await.unwrap();
        assert_eq!(task, Task::from(existing));

        let stmt = single_statement(repo.db.into_transaction_log());
        assert!(stmt.sql.starts_with("SELECT"));
    }

    #[tokio::test]
    async fn test_clear_due_date_alone_is_a_real_update() {
        let existing = row("Pay rent");
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![existing.clone()]])
            .into_connection();
        let repo = PgTaskRepository::new(db);

        let update = UpdateTask {
            clear_due_date: true,
            ..Default::default()
        };
        let task = repo.update(existing.id, update).await.unwrap();
        assert!(task.due_date.is_none());

        let stmt = single_statement(repo.db.into_transaction_log());
        assert!(
            stmt.sql
                .starts_with("UPDATE tasks SET due_date = NULL, updated_at = now() WHERE id = $1"),
            "{}",
            stmt.sql
        );
        let values = stmt.values.unwrap().0;
        assert_eq!(values.len(), 1);
        assert_eq!(<Uuid as ValueType>::try_from(values[0].clone()).unwrap(), existing.id);
    }

    #[tokio::test]
    async fn test_empty_update_on_missing_row_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([no_rows()])
            .into_connection();
        let repo = PgTaskRepository::new(db);

        let err = repo.update(Uuid::now_v7(), UpdateTask::default()).await.unwrap_err();
        assert!(matches!(err, TaskError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_update_with_conflicting_due_fields_issues_no_statement() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let repo = PgTaskRepository::new(db);

        let err = repo
            .update(
                Uuid::now_v7(),
                UpdateTask {
                    due_date: Some(Utc::now()),
                    clear_due_date: true,
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, TaskError::Validation(_)));
        assert!(repo.db.into_transaction_log().is_empty());
    }

    #[tokio::test]
    async fn test_delete_existing_row() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([affected(1)])
            .into_connection();
        let repo = PgTaskRepository::new(db);

        assert!(repo.delete(Uuid::now_v7()).await.is_ok());
    }

    #[tokio::test]
    async fn test_delete_zero_rows_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([affected(0)])
            .into_connection();
        let repo = PgTaskRepository::new(db);
        let id = Uuid::now_v7();

        let err = repo.delete(id).await.unwrap_err();
        assert!(matches!(err, TaskError::NotFound(missing) if missing == id));
    }

    #[tokio::test]
    async fn test_list_due_within_filters_and_orders() {
        let soon = entity::Model {
            due_date: Some(ts(30 * 60)),
            ..row("due in 30 minutes")
        };
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![soon.clone()]])
            .into_connection();
        let repo = PgTaskRepository::new(db);

        let before = Utc::now();
        let tasks = repo.list_due_within(TimeDelta::minutes(60)).await.unwrap();
        let after = Utc::now();
        assert_eq!(tasks, vec![Task::from(soon)]);

        let stmt = single_statement(repo.db.into_transaction_log());
        assert!(stmt.sql.contains("completed = FALSE"));
        assert!(stmt.sql.contains("due_date IS NOT NULL"));
        assert!(stmt.sql.contains("due_date <= $1"));
        assert!(stmt.sql.ends_with("ORDER BY due_date ASC"));

        let values = stmt.values.unwrap().0;
        let deadline = <chrono::DateTime<Utc> as ValueType>::try_from(values[0].clone()).unwrap();
        assert!(deadline >= before + TimeDelta::minutes(60));
        assert!(deadline <= after + TimeDelta::minutes(60));
    }

    #[tokio::test]
    async fn test_list_due_within_rejects_out_of_range_window() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let repo = PgTaskRepository::new(db);

        let err = repo.list_due_within(TimeDelta::MAX).await.unwrap_err();
        assert!(matches!(err, TaskError::Validation(_)));
    }
}
