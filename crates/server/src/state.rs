use crate::config::Config;
use sea_orm::DatabaseConnection;
use std::sync::Arc;

/// Shared by every handler through axum's `State` extractor
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(db: DatabaseConnection, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }
}
