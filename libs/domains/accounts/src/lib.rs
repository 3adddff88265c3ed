//! Accounts Domain
//!
//! Accounts own tasks. They are created once, listed newest first, and only
//! ever mutated by [`AccountRepository::touch`], which refreshes the activity
//! marker. Deleting an account leaves its tasks in place.

pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

pub use error::{AccountError, AccountResult};
pub use handlers::AccountsApiDoc;
pub use models::{Account, AccountListQuery, CreateAccount, DEFAULT_LIST_LIMIT};
pub use postgres::PgAccountRepository;
pub use repository::AccountRepository;
pub use service::AccountService;
