//! Filesystem-backed collaborators.
//!
//! `LocalContentStore` keeps one JSON file per blob, named by the BLAKE3
//! hash of its canonical bytes. `LocalRegistry` keeps every owner's
//! identifier list in a single JSON file. Both write atomically.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::debug;

use super::traits::{ContentStore, Registry};
use super::types::{ContentId, StoredEntry, TransactionId};
use crate::error::{DiaryError, Result};
use crate::fs::write_atomic;

/// Prefix marking BLAKE3 content identifiers.
const CONTENT_ID_PREFIX: &str = "b3";

/// Registry file format version.
const REGISTRY_FORMAT_VERSION: u32 = 1;

/// Content-addressed blob directory.
#[derive(Debug, Clone)]
pub struct LocalContentStore {
    root: PathBuf,
}

impl LocalContentStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The identifier a blob would be stored under.
    pub fn content_id(bytes: &[u8]) -> ContentId {
        ContentId::new(format!(
            "{}{}",
            CONTENT_ID_PREFIX,
            blake3::hash(bytes).to_hex()
        ))
    }

    fn blob_path(&self, id: &ContentId) -> Result<PathBuf> {
        let valid = !id.as_str().is_empty()
            && id.as_str().chars().all(|c| c.is_ascii_alphanumeric());
        if !valid {
            return Err(DiaryError::InvalidInput(format!(
                "Invalid content identifier: {}",
                id
            )));
        }
        Ok(self.root.join(format!("{}.json", id)))
    }
}

/// Run [`write_atomic`] on the blocking pool.
async fn write_atomic_blocking(path: PathBuf, bytes: Vec<u8>) -> std::io::Result<()> {
    tokio::task::spawn_blocking(move || write_atomic(&path, &bytes))
        .await
        .map_err(std::io::Error::other)?
}

#[async_trait]
impl ContentStore for LocalContentStore {
    async fn put(&self, blob: &Value) -> Result<ContentId> {
        let bytes = serde_json::to_vec(blob)?;
        let id = Self::content_id(&bytes);
        let path = self.blob_path(&id)?;
        let len = bytes.len();
        let exists = tokio::fs::try_exists(&path)
            .await
            .map_err(|e| DiaryError::Storage(format!("Failed to check blob {}: {}", id, e)))?;
        if !exists {
            write_atomic_blocking(path, bytes)
                .await
                .map_err(|e| DiaryError::Storage(format!("Failed to store blob {}: {}", id, e)))?;
        }
        debug!(%id, bytes = len, "stored blob");
        Ok(id)
    }

    async fn fetch(&self, id: &ContentId) -> Result<Value> {
        let path = self
            .blob_path(id)
            .map_err(|e| DiaryError::Transport(e.to_string()))?;
        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|e| DiaryError::Transport(format!("Failed to fetch {}: {}", id, e)))?;
        serde_json::from_slice(&bytes)
            .map_err(|e| DiaryError::Transport(format!("Blob {} is not JSON: {}", id, e)))
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct RegistryFile {
    version: u32,
    owners: BTreeMap<String, Vec<RegistryRow>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RegistryRow {
    id: ContentId,
    recorded_at: DateTime<Utc>,
    transaction_id: TransactionId,
}

/// Append-only registry persisted as one JSON file.
#[derive(Debug)]
pub struct LocalRegistry {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl LocalRegistry {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<RegistryFile> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => {
                let file: RegistryFile = serde_json::from_slice(&bytes).map_err(|e| {
                    DiaryError::Storage(format!(
                        "Registry {} is corrupt: {}",
                        self.path.display(),
                        e
                    ))
                })?;
                if file.version > REGISTRY_FORMAT_VERSION {
                    return Err(DiaryError::Storage(format!(
                        "Registry format version {} is newer than supported ({})",
                        file.version, REGISTRY_FORMAT_VERSION
                    )));
                }
                Ok(file)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(RegistryFile {
                version: REGISTRY_FORMAT_VERSION,
                owners: BTreeMap::new(),
            }),
            Err(e) => Err(DiaryError::Storage(format!(
                "Failed to read registry {}: {}",
                self.path.display(),
                e
            ))),
        }
    }
}

fn owner_key(owner: &str) -> String {
    owner.trim().to_lowercase()
}

fn transaction_id(owner: &str, id: &ContentId, at: DateTime<Utc>) -> TransactionId {
    let mut hasher = blake3::Hasher::new();
    hasher.update(owner.as_bytes());
    hasher.update(id.as_str().as_bytes());
    hasher.update(at.to_rfc3339().as_bytes());
    TransactionId::new(format!("0x{}", hasher.finalize().to_hex()))
}

#[async_trait]
impl Registry for LocalRegistry {
    async fn append(&self, owner: &str, id: &ContentId) -> Result<TransactionId> {
        if owner.trim().is_empty() {
            return Err(DiaryError::InvalidInput(
                "Owner address cannot be empty".to_string(),
            ));
        }
        let _guard = self.write_lock.lock().await;

        let mut file = self.load().await?;
        let recorded_at = Utc::now();
        let tx = transaction_id(&owner_key(owner), id, recorded_at);
        file.owners
            .entry(owner_key(owner))
            .or_default()
            .push(RegistryRow {
                id: id.clone(),
                recorded_at,
                transaction_id: tx.clone(),
            });
        file.version = REGISTRY_FORMAT_VERSION;

        let bytes = serde_json::to_vec_pretty(&file)?;
        write_atomic_blocking(self.path.clone(), bytes).await.map_err(|e| {
            DiaryError::Storage(format!(
                "Failed to write registry {}: {}",
                self.path.display(),
                e
            ))
        })?;
        debug!(%id, %tx, "registry append");
        Ok(tx)
    }

    async fn list(&self, owner: &str) -> Result<Vec<StoredEntry>> {
        let file = self.load().await?;
        Ok(file
            .owners
            .get(&owner_key(owner))
            .map(|rows| {
                rows.iter()
                    .map(|row| StoredEntry::new(row.id.clone(), row.recorded_at))
                    .collect()
            })
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_store_is_content_addressed() {
        let dir = tempdir().unwrap();
        let store = LocalContentStore::new(dir.path());
        let blob = json!({"encrypted": true, "ciphertext": "abc"});

        let first = store.put(&blob).await.unwrap();
        let second = store.put(&blob).await.unwrap();
        assert_eq!(first, second);
        assert!(first.as_str().starts_with(CONTENT_ID_PREFIX));

        let other = store.put(&json!({"encrypted": true, "ciphertext": "abd"})).await.unwrap();
        assert_ne!(first, other);

        assert_eq!(store.fetch(&first).await.unwrap(), blob);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_puts_of_same_blob() {
        let dir = tempdir().unwrap();
        let store = LocalContentStore::new(dir.path());
        let blob = json!({"encrypted": true, "ciphertext": "shared"});

        let ids = futures::future::join_all((0..8).map(|_| store.put(&blob))).await;
        let ids: Vec<ContentId> = ids.into_iter().map(|r| r.unwrap()).collect();
        assert!(ids.windows(2).all(|w| w[0] == w[1]));

        let names: Vec<String> = std::fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec![format!("{}.json", ids[0])]);
        assert_eq!(store.fetch(&ids[0]).await.unwrap(), blob);
    }

    #[tokio::test]
    async fn test_fetch_missing_is_transport_error() {
        let dir = tempdir().unwrap();
        let store = LocalContentStore::new(dir.path());

        let result = store.fetch(&ContentId::new("b3missing")).await;
        assert!(matches!(result, Err(DiaryError::Transport(_))));
    }

    #[tokio::test]
    async fn test_fetch_rejects_path_traversal() {
        let dir = tempdir().unwrap();
        let store = LocalContentStore::new(dir.path());

        let result = store.fetch(&ContentId::new("../config")).await;
        assert!(matches!(result, Err(DiaryError::Transport(_))));
    }

    #[tokio::test]
    async fn test_registry_append_and_list_in_order() {
        let dir = tempdir().unwrap();
        let registry = LocalRegistry::new(dir.path().join("registry.json"));

        assert!(registry.list("0xAlice").await.unwrap().is_empty());

        let tx1 = registry.append("0xAlice", &ContentId::new("b3one")).await.unwrap();
        let tx2 = registry.append("0xalice", &ContentId::new("b3two")).await.unwrap();
        registry.append("0xBob", &ContentId::new("b3three")).await.unwrap();
        assert_ne!(tx1, tx2);

        let entries = registry.list("0xALICE").await.unwrap();
        let ids: Vec<&str> = entries.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["b3one", "b3two"]);
        assert!(entries[0].recorded_at <= entries[1].recorded_at);

        // Survives a reopen
        let reopened = LocalRegistry::new(registry.path());
        assert_eq!(reopened.list("0xbob").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_registry_rejects_empty_owner() {
        let dir = tempdir().unwrap();
        let registry = LocalRegistry::new(dir.path().join("registry.json"));

        let result = registry.append("  ", &ContentId::new("b3one")).await;
        assert!(matches!(result, Err(DiaryError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_corrupt_registry_is_storage_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("registry.json");
        std::fs::write(&path, b"not json").unwrap();

        let result = LocalRegistry::new(&path).list("0xalice").await;
        assert!(matches!(result, Err(DiaryError::Storage(_))));
    }
}
