//! Handler tests for the tasks domain
//!
//! The router runs over a mock connection, so these cover request parsing,
//! status codes and response bodies without a live database.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::Utc;
use domain_tasks::*;
use http_body_util::BodyExt;
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, MockExecResult};
use serde_json::{Value, json};
use tower::ServiceExt; // For oneshot()
use uuid::Uuid;

async fn json_body<T: serde::de::DeserializeOwned>(body: Body) -> T {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn row(title: &str, completed: bool) -> entity::Model {
    let now = Utc::now().fixed_offset();
    entity::Model {
        id: Uuid::now_v7(),
        account_id: Uuid::now_v7(),
        title: title.to_string(),
        description: None,
        due_date: None,
        completed,
        created_at: now,
        updated_at: now,
    }
}

fn app(db: DatabaseConnection) -> axum::Router {
    handlers::router(TaskService::new(PgTaskRepository::new(db)))
}

fn empty_db() -> DatabaseConnection {
    MockDatabase::new(DatabaseBackend::Postgres).into_connection()
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn test_create_task_returns_201() {
    let stored = row("Buy milk", false);
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![stored.clone()]])
        .into_connection();

    let response = app(db)
        .oneshot(json_request(
            "POST",
            "/",
            json!({ "account_id": stored.account_id, "title": "Buy milk" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let task: Task = json_body(response.into_body()).await;
    assert_eq!(task.id, stored.id);
    assert_eq!(task.title, "Buy milk");
    assert!(!task.completed);
}

#[tokio::test]
async fn test_create_task_rejects_empty_title() {
    let response = app(empty_db())
        .oneshot(json_request(
            "POST",
            "/",
            json!({ "account_id": Uuid::now_v7(), "title": "" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_task_not_found_returns_404() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<entity::Model>::new()])
        .into_connection();

    let response = app(db)
        .oneshot(empty_request("GET", &format!("/{}", Uuid::now_v7())))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["error"], "NOT_FOUND");
}

#[tokio::test]
async fn test_get_task_rejects_malformed_id() {
    let response = app(empty_db())
        .oneshot(empty_request("GET", "/not-a-uuid"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_tasks_requires_account_id() {
    let response = app(empty_db())
        .oneshot(empty_request("GET", "/"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_tasks_rejects_malformed_account_id() {
    let response = app(empty_db())
        .oneshot(empty_request("GET", "/?account_id=42"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_tasks_returns_rows() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![row("newer", false), row("older", true)]])
        .into_connection();

    let response = app(db)
        .oneshot(empty_request(
            "GET",
            &format!("/?account_id={}", Uuid::now_v7()),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let tasks: Vec<Task> = json_body(response.into_body()).await;
    let titles: Vec<_> = tasks.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, ["newer", "older"]);
}

#[tokio::test]
async fn test_update_task_rejects_due_date_with_clear_flag() {
    let response = app(empty_db())
        .oneshot(json_request(
            "PUT",
            &format!("/{}", Uuid::now_v7()),
            json!({ "due_date": "2030-01-02T03:04:05Z", "clear_due_date": true }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_task_returns_new_state() {
    let mut updated = row("Buy oat milk", false);
    updated.description = Some("two litres".into());
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![updated.clone()]])
        .into_connection();

    let response = app(db)
        .oneshot(json_request(
            "PUT",
            &format!("/{}", updated.id),
            json!({ "title": "Buy oat milk", "description": "two litres" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let task: Task = json_body(response.into_body()).await;
    assert_eq!(task.title, "Buy oat milk");
    assert_eq!(task.description.as_deref(), Some("two litres"));
}

#[tokio::test]
async fn test_complete_task() {
    let done = row("Buy milk", true);
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![done.clone()]])
        .into_connection();

    let response = app(db)
        .oneshot(empty_request("PATCH", &format!("/{}/complete", done.id)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let task: Task = json_body(response.into_body()).await;
    assert!(task.completed);
}

#[tokio::test]
async fn test_delete_task_returns_204_then_404() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([
            MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            },
            MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            },
        ])
        .into_connection();
    let app = app(db);
    let uri = format!("/{}", Uuid::now_v7());

    let response = app
        .clone()
        .oneshot(empty_request("DELETE", &uri))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app.oneshot(empty_request("DELETE", &uri)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_database_failure_hides_details() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_errors([sea_orm::DbErr::Custom("relation \"tasks\" does not exist".into())])
        .into_connection();

    let response = app(db)
        .oneshot(empty_request("GET", &format!("/{}", Uuid::now_v7())))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = json_body(response.into_body()).await;
    assert!(!body["message"].as_str().unwrap().contains("relation"));
}
