use chrono::TimeDelta;
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::error::{TaskError, TaskResult};
use crate::models::{CreateTask, DueTasksReport, Task, UpdateTask, normalize_window_minutes};
use crate::repository::TaskRepository;

/// Service layer for Task business logic
pub struct TaskService<R: TaskRepository> {
    repository: Arc<R>,
}

impl<R: TaskRepository> Clone for TaskService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R: TaskRepository> TaskService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    #[instrument(skip(self, input), fields(account_id = %input.account_id))]
    pub async fn create_task(&self, input: CreateTask) -> TaskResult<Task> {
        input.validate()?;
        self.repository.create(input).await
    }

    #[instrument(skip(self), fields(task_id = %id))]
    pub async fn get_task(&self, id: Uuid) -> TaskResult<Task> {
        self.repository.get(id).await
    }

    #[instrument(skip(self), fields(account_id = %account_id))]
    pub async fn list_tasks(&self, account_id: Uuid) -> TaskResult<Vec<Task>> {
        self.repository.list_by_account(account_id).await
    }

    /// Rejects `due_date` together with `clear_due_date` before the
    /// repository is reached.
    #[instrument(skip(self, input), fields(task_id = %id))]
    pub async fn update_task(&self, id: Uuid, input: UpdateTask) -> TaskResult<Task> {
        input.ensure_due_date_exclusive()?;
        input.validate()?;
        self.repository.update(id, input).await
    }

    /// Same as an update carrying only `completed = true`
    #[instrument(skip(self), fields(task_id = %id))]
    pub async fn complete_task(&self, id: Uuid) -> TaskResult<Task> {
        self.repository.update(id, UpdateTask::complete()).await
    }

    #[instrument(skip(self), fields(task_id = %id))]
    pub async fn delete_task(&self, id: Uuid) -> TaskResult<()> {
        self.repository.delete(id).await
    }

    /// Report of incomplete tasks due within the next `window_minutes`
    /// (60 when absent or non-positive).
    #[instrument(skip(self))]
    pub async fn list_due(&self, window_minutes: Option<i64>) -> TaskResult<DueTasksReport> {
        let window_minutes = normalize_window_minutes(window_minutes);
        let window = TimeDelta::try_minutes(window_minutes).ok_or_else(|| {
            TaskError::Validation(format!("window of {window_minutes} minutes is out of range"))
        })?;

        let tasks = self.repository.list_due_within(window).await?;
        tracing::info!(window_minutes, count = tasks.len(), "Listed due tasks");
        Ok(DueTasksReport::new(window_minutes, tasks))
    }
}
