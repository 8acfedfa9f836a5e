use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;

use super::{Storage, StorageKey};
use crate::error::AppResult;

/// In-process storage substrate
///
/// Cloning shares the underlying map, so a reloaded engine handed a clone
/// sees everything the previous instance persisted. Used in tests and as a
/// default when no durable substrate is wired in.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<Mutex<HashMap<StorageKey, Vec<u8>>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl Storage for MemoryStorage {
    async fn get(&self, key: StorageKey) -> AppResult<Option<Vec<u8>>> {
        Ok(self.entries.lock().await.get(&key).cloned())
    }

    async fn set(&self, key: StorageKey, bytes: Vec<u8>) -> AppResult<()> {
        self.entries.lock().await.insert(key, bytes);
        Ok(())
    }
}
