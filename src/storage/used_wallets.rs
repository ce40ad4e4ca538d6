use std::sync::Arc;
use tracing::warn;

use super::KeyValueStore;
use crate::constants::USED_WALLETS_KEY;
use crate::errors::{KitError, Result};

/// Most-recently-used provider ids, newest first, without duplicates.
#[derive(Clone)]
pub struct UsedWalletsRegistry {
    store: Arc<dyn KeyValueStore>,
}

impl UsedWalletsRegistry {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Unreadable or corrupt records read as an empty list.
    pub fn read(&self) -> Vec<String> {
        let record = match self.store.get(USED_WALLETS_KEY) {
            Ok(record) => record,
            Err(e) => {
                warn!("Failed to read used wallets record: {}", e);
                return Vec::new();
            }
        };

        match record {
            Some(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                warn!("Ignoring corrupt used wallets record: {}", e);
                Vec::new()
            }),
            None => Vec::new(),
        }
    }

    pub fn record(&self, id: &str) -> Result<Vec<String>> {
        let mut ids = self.read();
        ids.retain(|existing| existing != id);
        ids.insert(0, id.to_string());

        self.store.set(USED_WALLETS_KEY, &serde_json::to_string(&ids)?)?;
        Ok(ids)
    }

    pub fn clear(&self) -> Result<()> {
        self.store.remove(USED_WALLETS_KEY)
    }

    /// [`read`](Self::read) on the blocking pool, for async callers.
    pub async fn read_blocking(&self) -> Vec<String> {
        let registry = self.clone();
        tokio::task::spawn_blocking(move || registry.read())
            .await
            .unwrap_or_else(|e| {
                warn!("Used wallets read did not finish: {}", e);
                Vec::new()
            })
    }

    /// [`record`](Self::record) on the blocking pool, for async callers.
    pub async fn record_blocking(&self, id: &str) -> Result<Vec<String>> {
        let registry = self.clone();
        let id = id.to_string();
        tokio::task::spawn_blocking(move || registry.record(&id))
            .await
            .map_err(|e| KitError::Storage(format!("used wallets write did not finish: {}", e)))?
    }
}
