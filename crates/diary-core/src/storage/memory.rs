//! In-memory collaborators for tests and simulation.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use tokio::sync::Mutex;

use super::traits::{ContentStore, Registry, Wallet};
use super::types::{ContentId, StoredEntry, TransactionId};
use crate::crypto::Signature;
use crate::error::{DiaryError, Result};

/// Content store held in a map, with per-identifier failure injection.
#[derive(Debug, Default)]
pub struct MemoryContentStore {
    blobs: Mutex<HashMap<ContentId, Value>>,
    failing: Mutex<HashSet<ContentId>>,
    failing_put: AtomicBool,
}

impl MemoryContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a blob under a chosen identifier.
    pub async fn insert(&self, id: ContentId, blob: Value) {
        self.blobs.lock().await.insert(id, blob);
    }

    /// Make every fetch of `id` fail with a transport error.
    pub async fn fail_fetch(&self, id: ContentId) {
        self.failing.lock().await.insert(id);
    }

    /// Make every put fail with a storage error until cleared.
    pub fn fail_put(&self, failing: bool) {
        self.failing_put.store(failing, Ordering::SeqCst);
    }

    pub async fn blob_count(&self) -> usize {
        self.blobs.lock().await.len()
    }
}

#[async_trait]
impl ContentStore for MemoryContentStore {
    async fn put(&self, blob: &Value) -> Result<ContentId> {
        if self.failing_put.load(Ordering::SeqCst) {
            return Err(DiaryError::Storage("pinning service rejected the upload".to_string()));
        }
        let bytes = serde_json::to_vec(blob)?;
        let id = ContentId::new(format!("mem{}", blake3::hash(&bytes).to_hex()));
        self.blobs.lock().await.insert(id.clone(), blob.clone());
        Ok(id)
    }

    async fn fetch(&self, id: &ContentId) -> Result<Value> {
        if self.failing.lock().await.contains(id) {
            return Err(DiaryError::Transport(format!("gateway unreachable for {}", id)));
        }
        self.blobs
            .lock()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| DiaryError::Transport(format!("{} not pinned", id)))
    }
}

/// Registry held in a map.
#[derive(Debug, Default)]
pub struct MemoryRegistry {
    entries: Mutex<HashMap<String, Vec<StoredEntry>>>,
    writes: Mutex<u64>,
    failing_append: AtomicBool,
}

impl MemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an entry with an explicit timestamp.
    pub async fn insert(&self, owner: &str, entry: StoredEntry) {
        self.entries
            .lock()
            .await
            .entry(owner.to_lowercase())
            .or_default()
            .push(entry);
    }

    /// Make every append fail with a storage error until cleared.
    pub fn fail_append(&self, failing: bool) {
        self.failing_append.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl Registry for MemoryRegistry {
    async fn append(&self, owner: &str, id: &ContentId) -> Result<TransactionId> {
        if self.failing_append.load(Ordering::SeqCst) {
            return Err(DiaryError::Storage(format!("transaction for {} reverted", id)));
        }
        let mut writes = self.writes.lock().await;
        *writes += 1;
        self.insert(owner, StoredEntry::new(id.clone(), Utc::now()))
            .await;
        Ok(TransactionId::new(format!("0x{:064x}", *writes)))
    }

    async fn list(&self, owner: &str) -> Result<Vec<StoredEntry>> {
        Ok(self
            .entries
            .lock()
            .await
            .get(&owner.to_lowercase())
            .cloned()
            .unwrap_or_default())
    }
}

/// Wallet that answers every request with a fixed signature, or declines.
#[derive(Debug, Clone)]
pub struct StaticWallet {
    address: String,
    signature: Option<String>,
}

impl StaticWallet {
    pub fn new(address: impl Into<String>, signature: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            signature: Some(signature.into()),
        }
    }

    /// A wallet whose user refuses every signature request.
    pub fn declining(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            signature: None,
        }
    }
}

#[async_trait]
impl Wallet for StaticWallet {
    fn address(&self) -> &str {
        &self.address
    }

    async fn sign_message(&self, _message: &str) -> Result<Signature> {
        match &self.signature {
            Some(signature) => Ok(Signature::new(signature.clone())),
            None => Err(DiaryError::Declined("user rejected the request".to_string())),
        }
    }
}
