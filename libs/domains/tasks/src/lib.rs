//! Tasks Domain
//!
//! Task records owned by accounts, stored in the `tasks` table.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP routes under /tasks
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Validation, due-task reports
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Raw SQL over the shared pool, sparse updates
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_tasks::{PgTaskRepository, TaskService};
//! use sea_orm::Database;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let db = Database::connect("postgres://...").await?;
//!
//! let service = TaskService::new(PgTaskRepository::new(db));
//! let router = domain_tasks::handlers::router(service);
//! # let _ = router;
//! # Ok(())
//! # }
//! ```

pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;
mod update_builder;

pub use error::{TaskError, TaskResult};
pub use handlers::TasksApiDoc;
pub use models::{
    CreateTask, DEFAULT_DUE_WINDOW_MINUTES, DueTasksReport, Task, TaskListQuery, UpdateTask,
};
pub use postgres::PgTaskRepository;
pub use repository::TaskRepository;
pub use service::TaskService;
