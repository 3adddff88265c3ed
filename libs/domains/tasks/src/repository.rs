use async_trait::async_trait;
use chrono::TimeDelta;
use uuid::Uuid;

use crate::error::TaskResult;
use crate::models::{CreateTask, Task, UpdateTask};

/// Repository trait for Task persistence
///
/// Each call is one unit of work against the shared pool. Dropping the
/// returned future cancels the in-flight statement.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Insert a task with a locally generated id and return the stored row
    async fn create(&self, input: CreateTask) -> TaskResult<Task>;

    /// `NotFound` when no row matches
    async fn get(&self, id: Uuid) -> TaskResult<Task>;

    /// Tasks owned by `account_id`, newest first
    async fn list_by_account(&self, account_id: Uuid) -> TaskResult<Vec<Task>>;

    /// Apply a sparse update and return the new row state.
    ///
    /// A no-op update behaves exactly like [`get`](Self::get).
    async fn update(&self, id: Uuid, input: UpdateTask) -> TaskResult<Task>;

    /// `NotFound` when nothing was deleted
    async fn delete(&self, id: Uuid) -> TaskResult<()>;

    /// Incomplete tasks due at or before now + `window`, soonest first
    async fn list_due_within(&self, window: TimeDelta) -> TaskResult<Vec<Task>>;
}
