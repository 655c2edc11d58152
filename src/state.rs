use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::config::Config;
use crate::selector::{self, Selector};

/// Shared handler state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    /// Policy behind `GET /api/next/`.
    pub selector: Arc<dyn Selector>,
    pub catalog_size: i32,
}

impl AppState {
    pub fn new(db: DatabaseConnection, config: &Config) -> Self {
        Self {
            db,
            selector: selector::for_policy(config.selection_policy, config.catalog_size),
            catalog_size: config.catalog_size,
        }
    }
}
