use crate::config::Config;
use sea_orm::DatabaseConnection;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Pool shared by every repository
    pub db: DatabaseConnection,
}
