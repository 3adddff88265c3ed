use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch},
};
use axum_helpers::{AppError, UuidPath, ValidatedJson};
use std::sync::Arc;
use utoipa::OpenApi;
use uuid::Uuid;

use crate::error::TaskResult;
use crate::models::{CreateTask, DueTasksReport, Task, TaskListQuery, UpdateTask};
use crate::repository::TaskRepository;
use crate::service::TaskService;

type SharedService<R> = State<Arc<TaskService<R>>>;

#[derive(OpenApi)]
#[openapi(
    paths(list_tasks, get_task, create_task, update_task, delete_task, complete_task),
    components(schemas(Task, CreateTask, UpdateTask, DueTasksReport)),
    tags((name = "tasks", description = "Task management"))
)]
pub struct TasksApiDoc;

/// Routes relative to the mount point, e.g. `.nest("/tasks", router(service))`.
pub fn router<R: TaskRepository + 'static>(service: TaskService<R>) -> Router {
    Router::new()
        .route("/", get(list_tasks::<R>).post(create_task::<R>))
        .route(
            "/{id}",
            get(get_task::<R>).put(update_task::<R>).delete(delete_task::<R>),
        )
        .route("/{id}/complete", patch(complete_task::<R>))
        .with_state(Arc::new(service))
}

/// List an account's tasks, newest first
#[utoipa::path(
    get,
    path = "/tasks",
    tag = "tasks",
    params(TaskListQuery),
    responses(
        (status = 200, description = "Tasks owned by the account", body = Vec<Task>),
        (status = 400, description = "Missing or malformed account_id"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn list_tasks<R: TaskRepository>(
    State(service): SharedService<R>,
    query: Result<Query<TaskListQuery>, axum::extract::rejection::QueryRejection>,
) -> Result<Json<Vec<Task>>, AppError> {
    let Query(query) = query.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let account_id = query
        .account_id
        .ok_or_else(|| AppError::BadRequest("account_id query parameter is required".into()))?;

    Ok(Json(service.list_tasks(account_id).await?))
}

#[utoipa::path(
    get,
    path = "/tasks/{id}",
    tag = "tasks",
    params(("id" = Uuid, Path, description = "Task ID")),
    responses(
        (status = 200, description = "Task found", body = Task),
        (status = 400, description = "Invalid task ID"),
        (status = 404, description = "Task not found")
    )
)]
pub async fn get_task<R: TaskRepository>(
    State(service): SharedService<R>,
    UuidPath(id): UuidPath,
) -> TaskResult<Json<Task>> {
    Ok(Json(service.get_task(id).await?))
}

#[utoipa::path(
    post,
    path = "/tasks",
    tag = "tasks",
    request_body = CreateTask,
    responses(
        (status = 201, description = "Task created", body = Task),
        (status = 400, description = "Invalid request"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn create_task<R: TaskRepository>(
    State(service): SharedService<R>,
    ValidatedJson(input): ValidatedJson<CreateTask>,
) -> TaskResult<impl IntoResponse> {
    let task = service.create_task(input).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

/// Partially update a task; absent fields are left untouched
#[utoipa::path(
    put,
    path = "/tasks/{id}",
    tag = "tasks",
    params(("id" = Uuid, Path, description = "Task ID")),
    request_body = UpdateTask,
    responses(
        (status = 200, description = "Task updated", body = Task),
        (status = 400, description = "Invalid request"),
        (status = 404, description = "Task not found")
    )
)]
pub async fn update_task<R: TaskRepository>(
    State(service): SharedService<R>,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<UpdateTask>,
) -> TaskResult<Json<Task>> {
    Ok(Json(service.update_task(id, input).await?))
}

#[utoipa::path(
    delete,
    path = "/tasks/{id}",
    tag = "tasks",
    params(("id" = Uuid, Path, description = "Task ID")),
    responses(
        (status = 204, description = "Task deleted"),
        (status = 400, description = "Invalid task ID"),
        (status = 404, description = "Task not found")
    )
)]
pub async fn delete_task<R: TaskRepository>(
    State(service): SharedService<R>,
    UuidPath(id): UuidPath,
) -> TaskResult<StatusCode> {
    service.delete_task(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Mark a task as completed
#[utoipa::path(
    patch,
    path = "/tasks/{id}/complete",
    tag = "tasks",
    params(("id" = Uuid, Path, description = "Task ID")),
    responses(
        (status = 200, description = "Task completed", body = Task),
        (status = 404, description = "Task not found")
    )
)]
pub async fn complete_task<R: TaskRepository>(
    State(service): SharedService<R>,
    UuidPath(id): UuidPath,
) -> TaskResult<Json<Task>> {
    Ok(Json(service.complete_task(id).await?))
}
