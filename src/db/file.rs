use std::path::PathBuf;

use super::{Storage, StorageKey};
use crate::error::AppResult;

/// File-backed storage substrate: one file per logical key under a data dir
///
/// Writes go through a temp file followed by a rename so a crash mid-write
/// never leaves a half-written collection behind.
#[derive(Debug, Clone)]
pub struct FileStorage {
    data_dir: PathBuf,
}

impl FileStorage {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    fn path_for(&self, key: StorageKey) -> PathBuf {
        self.data_dir.join(format!("{}.json", key))
    }
}

#[async_trait::async_trait]
impl Storage for FileStorage {
    async fn get(&self, key: StorageKey) -> AppResult<Option<Vec<u8>>> {
        match tokio::fs::read(self.path_for(key)).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set(&self, key: StorageKey, bytes: Vec<u8>) -> AppResult<()> {
        tokio::fs::create_dir_all(&self.data_dir).await?;
        let path = self.path_for(key);
        let tmp = self.data_dir.join(format!("{}.json.tmp", key));
        tokio::fs::write(&tmp, &bytes).await?;
        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }
}
