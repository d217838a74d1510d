//! Chooses the storage backend once, at startup.

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{error, info};

use super::memory::MemoryStorage;
use super::seed::seed_storage;
use super::sqlite::SqliteStorage;
use super::traits::Storage;
use crate::config::Config;

/// Build the backend named by `config` and seed it.
///
/// With a database URL the sqlite backend is used; failing to connect is fatal,
/// failing to seed is only logged. Without one the in-memory backend is used.
pub async fn select_storage(config: &Config) -> Result<Arc<dyn Storage>> {
    match &config.database_url {
        Some(url) => {
            info!("DATABASE_URL is set, using sqlite storage");
            let storage = SqliteStorage::connect(url)
                .await
                .context("Failed to connect to the configured database")?;
            if let Err(e) = seed_storage(&storage).await {
                error!("Seeding sqlite storage failed, continuing without seed data: {:#}", e);
            }
            Ok(Arc::new(storage))
        }
        None => {
            info!("DATABASE_URL is not set, using in-memory storage");
            let storage = MemoryStorage::new();
            seed_storage(&storage).await?;
            Ok(Arc::new(storage))
        }
    }
}
