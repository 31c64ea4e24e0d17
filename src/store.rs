//! Remote object store client.
//!
//! A thin, stateless capability surface over keyed blob storage: upload,
//! resolve to a display-time reference, delete. Backed by a configurable
//! bucket root; the gallery only depends on these three calls and treats
//! every one of them as latency-bearing and fallible. Local state never
//! waits on them.

use std::path::PathBuf;

use crate::error::StoreError;

/// Client for a keyed blob store.
#[derive(Debug, Clone)]
pub struct ObjectStore {
    root: PathBuf,
}

impl ObjectStore {
    pub fn new(root: PathBuf) -> Self {
        ObjectStore { root }
    }

    fn object_path(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }

    /// Store `blob` under `key`, overwriting any previous object.
    pub async fn put(&self, key: &str, blob: &[u8]) -> Result<(), StoreError> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|source| StoreError::Put {
                key: key.to_string(),
                source,
            })?;

        tokio::fs::write(self.object_path(key), blob)
            .await
            .map_err(|source| StoreError::Put {
                key: key.to_string(),
                source,
            })
    }

    /// Resolve `key` to a displayable reference.
    pub async fn resolve(&self, key: &str) -> Result<PathBuf, StoreError> {
        let path = self.object_path(key);
        tokio::fs::metadata(&path)
            .await
            .map_err(|source| StoreError::Resolve {
                key: key.to_string(),
                source,
            })?;
        Ok(path)
    }

    /// Delete the object stored under `key`.
    pub async fn delete(&self, key: &str) -> Result<(), StoreError> {
        tokio::fs::remove_file(self.object_path(key))
            .await
            .map_err(|source| StoreError::Delete {
                key: key.to_string(),
                source,
            })
    }
}
