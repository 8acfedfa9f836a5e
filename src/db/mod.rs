use std::fmt::Display;

use serde::de::DeserializeOwned;

use crate::error::AppResult;

pub mod file;
pub mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

/// Logical keys for the persisted collections
///
/// The four collections are serialized independently so corrupt or missing
/// data under one key never prevents loading the others.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKey {
    Catalog,
    Jobs,
    Feedback,
    History,
}

impl StorageKey {
    pub const ALL: [StorageKey; 4] = [
        StorageKey::Catalog,
        StorageKey::Jobs,
        StorageKey::Feedback,
        StorageKey::History,
    ];
}

impl Display for StorageKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageKey::Catalog => write!(f, "catalog"),
            StorageKey::Jobs => write!(f, "jobs"),
            StorageKey::Feedback => write!(f, "feedback"),
            StorageKey::History => write!(f, "history"),
        }
    }
}

/// Byte-array get/set substrate for the engine's persisted state
///
/// Implementations only need key-value semantics; encoding is owned by the
/// engine and is always JSON via serde.
#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// Returns the bytes stored under `key`, or `None` if the key is absent
    async fn get(&self, key: StorageKey) -> AppResult<Option<Vec<u8>>>;

    /// Stores `bytes` under `key`, replacing any previous value
    async fn set(&self, key: StorageKey, bytes: Vec<u8>) -> AppResult<()>;
}

/// Loads and decodes one collection, tolerating missing and corrupt data
///
/// A missing key yields the default; a decode failure is logged and also
/// yields the default so startup never fails on bad state.
pub async fn load_or_default<T: DeserializeOwned + Default>(
    storage: &dyn Storage,
    key: StorageKey,
) -> T {
    match storage.get(key).await {
        Ok(Some(bytes)) => match serde_json::from_slice(&bytes) {
            Ok(value) => value,
            Err(e) => {
                tracing::error!(key = %key, error = %e, "Failed to decode persisted state, treating as empty");
                T::default()
            }
        },
        Ok(None) => T::default(),
        Err(e) => {
            tracing::error!(key = %key, error = %e, "Failed to read persisted state, treating as empty");
            T::default()
        }
    }
}
