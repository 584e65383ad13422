//! Key-value persistence for the catalog cache entry.
//!
//! The cache uses two keys: the serialized payload and the fetch timestamp
//! (epoch milliseconds as a decimal string). A store only has to remember
//! strings; interpretation belongs to the catalog module.

mod file;
mod memory;
mod sqlite;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

use crate::config::{PcatConfig, StoreBackend};

#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Value for `key`, or None if it was never set.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Insert or overwrite `key`.
    async fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// Open the store selected in the config at its default XDG location.
pub async fn open_configured(cfg: &PcatConfig) -> Result<Arc<dyn CacheStore>> {
    let store: Arc<dyn CacheStore> = match cfg.store {
        StoreBackend::File => Arc::new(FileStore::open_default()?),
        StoreBackend::Sqlite => Arc::new(SqliteStore::open_default().await?),
        StoreBackend::Memory => Arc::new(MemoryStore::new()),
    };
    tracing::debug!(backend = cfg.store.as_str(), "cache store opened");
    Ok(store)
}
