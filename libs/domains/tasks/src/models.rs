use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Window used by the due-task report when none (or a non-positive one) is given
pub const DEFAULT_DUE_WINDOW_MINUTES: i64 = 60;

/// A task owned by an account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Task {
    pub id: Uuid,
    /// Owning account
    pub account_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    /// Advanced by every applied update
    pub updated_at: DateTime<Utc>,
}

/// DTO for creating a new task
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateTask {
    #[validate(custom(function = "validate_not_nil"))]
    pub account_id: Uuid,
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
}

/// Sparse update; absent fields are left untouched.
///
/// `due_date` and `clear_due_date` are mutually exclusive.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_due_date_exclusive"))]
pub struct UpdateTask {
    #[validate(length(min = 1, max = 255))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub completed: Option<bool>,
    pub due_date: Option<DateTime<Utc>>,
    /// Set `due_date` to null
    #[serde(default)]
    pub clear_due_date: bool,
}

impl UpdateTask {
    /// Mark-complete shorthand used by `PATCH /tasks/{id}/complete`
    pub fn complete() -> Self {
        Self {
            completed: Some(true),
            ..Default::default()
        }
    }

    pub fn ensure_due_date_exclusive(&self) -> Result<(), crate::TaskError> {
        validate_due_date_exclusive(self)
            .map_err(|_| crate::TaskError::Validation(DUE_DATE_CONFLICT.to_string()))
    }
}

const DUE_DATE_CONFLICT: &str = "due_date and clear_due_date cannot both be set";

fn validate_due_date_exclusive(update: &UpdateTask) -> Result<(), ValidationError> {
    if update.due_date.is_some() && update.clear_due_date {
        let mut err = ValidationError::new("due_date_conflict");
        err.message = Some(DUE_DATE_CONFLICT.into());
        return Err(err);
    }
    Ok(())
}

fn validate_not_nil(id: &Uuid) -> Result<(), ValidationError> {
    if id.is_nil() {
        return Err(ValidationError::new("nil_uuid"));
    }
    Ok(())
}

/// Query for `GET /tasks`; `account_id` is mandatory
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TaskListQuery {
    /// Owning account to list tasks for
    pub account_id: Option<Uuid>,
}

/// Incomplete tasks due within a window, soonest first
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DueTasksReport {
    pub window_minutes: i64,
    pub count: usize,
    pub tasks: Vec<Task>,
}

impl DueTasksReport {
    pub fn new(window_minutes: i64, tasks: Vec<Task>) -> Self {
        Self {
            window_minutes,
            count: tasks.len(),
            tasks,
        }
    }
}

/// Absent or non-positive windows fall back to the default.
pub fn normalize_window_minutes(window_minutes: Option<i64>) -> i64 {
    match window_minutes {
        Some(minutes) if minutes > 0 => minutes,
        _ => DEFAULT_DUE_WINDOW_MINUTES,
    }
}
