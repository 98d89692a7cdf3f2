//! Collaborator interfaces.
//!
//! The wallet, the registry, and content storage are external services.
//! The core only depends on these traits; `local` and `memory` provide
//! implementations.

use async_trait::async_trait;
use serde_json::Value;

use super::types::{ContentId, StoredEntry, TransactionId};
use crate::crypto::Signature;
use crate::error::Result;

/// Signs messages on behalf of one account.
#[async_trait]
pub trait Wallet: Send + Sync {
    /// The account address entries are registered under.
    fn address(&self) -> &str;

    /// Request a signature over `message`.
    ///
    /// # Errors
    ///
    /// Returns `DiaryError::Declined` if the user refuses.
    async fn sign_message(&self, message: &str) -> Result<Signature>;
}

/// Append-only list of content identifiers per owner.
#[async_trait]
pub trait Registry: Send + Sync {
    /// Record `id` for `owner`.
    ///
    /// # Returns
    ///
    /// Returns the identifier of the write.
    ///
    /// # Errors
    ///
    /// Returns `DiaryError::Storage` if the write fails.
    async fn append(&self, owner: &str, id: &ContentId) -> Result<TransactionId>;

    /// All identifiers for `owner`, oldest first.
    async fn list(&self, owner: &str) -> Result<Vec<StoredEntry>>;
}

/// Content-addressed blob storage for envelopes.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Store a JSON blob and return its identifier.
    ///
    /// # Errors
    ///
    /// Returns `DiaryError::Storage` if the blob cannot be stored.
    async fn put(&self, blob: &Value) -> Result<ContentId>;

    /// Fetch a JSON blob.
    ///
    /// # Errors
    ///
    /// Returns `DiaryError::Transport` if the blob cannot be retrieved.
    async fn fetch(&self, id: &ContentId) -> Result<Value>;
}
