//! Application state for Lumo.
//!
//! Contains the shared state that is passed to all handlers.

use std::sync::Arc;

use crate::db::{self, pool::PoolConfig, DbPool};
use crate::repository::{SqlLinkRepository, SqlLumeRepository, SqlLumoRepository};
use crate::services::{LinkService, LumeService, LumoService};
use crate::{config, Result};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: DbPool,
    /// Lumo (travel plan) service.
    pub lumos: LumoService,
    /// Lume (plan node) service.
    pub lumes: LumeService,
    /// Link (edge) service.
    pub links: LinkService,
}

impl AppState {
    /// Create a new application state from the global configuration.
    pub async fn new() -> Result<Self> {
        let config = config::config();

        // Initialize database
        let pool_config = PoolConfig::with_max_connections(config.database.max_connections);
        let db = db::pool::create_pool_with_config(&config.database.path, pool_config).await?;

        // Initialize database schema
        db::initialize_schema(&db).await?;

        Ok(Self::from_pool(db))
    }

    /// Wire the services over an existing pool. The schema must already exist.
    pub fn from_pool(db: DbPool) -> Self {
        let lumos = LumoService::new(Arc::new(SqlLumoRepository::new(db.clone())));
        let lumes = LumeService::new(Arc::new(SqlLumeRepository::new(db.clone())));
        let links = LinkService::new(Arc::new(SqlLinkRepository::new(db.clone())));

        Self {
            db,
            lumos,
            lumes,
            links,
        }
    }
}
