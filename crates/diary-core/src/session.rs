//! One authenticated diary session.
//!
//! The derived key lives only inside a [`Session`] value and is passed
//! explicitly to the codec. Dropping or locking the session discards it.

use tracing::{info, warn};

use crate::crypto::{derive_key, DerivedKey, Signature, SIGNING_MESSAGE};
use crate::envelope::Envelope;
use crate::error::{DiaryError, Result};
use crate::record::DiaryRecord;
use crate::storage::{ContentStore, Receipt, Registry, Wallet};
use crate::timeline::{hydrate, Timeline, TimelineState};

/// A wallet owner and, once unlocked, the key derived from their signature.
#[derive(Debug)]
pub struct Session {
    owner: String,
    key: Option<DerivedKey>,
}

impl Session {
    /// Ask the wallet to sign [`SIGNING_MESSAGE`] and derive the session key.
    ///
    /// # Errors
    ///
    /// Returns `DiaryError::Declined` if the user refuses to sign.
    pub async fn authorize<W>(wallet: &W) -> Result<Self>
    where
        W: Wallet + ?Sized,
    {
        let signature = wallet.sign_message(SIGNING_MESSAGE).await?;
        Self::from_signature(wallet.address(), &signature)
    }

    /// Build a session from a signature obtained elsewhere.
    ///
    /// # Errors
    ///
    /// Returns `DiaryError::Declined` for a blank signature and
    /// `DiaryError::InvalidInput` for a blank owner.
    pub fn from_signature(owner: impl Into<String>, signature: &Signature) -> Result<Self> {
        let owner = validate_owner(owner.into())?;
        if signature.is_blank() {
            return Err(DiaryError::Declined("empty signature".to_string()));
        }
        let key = derive_key(signature);
        info!(owner = %owner, key = %key.fingerprint(), "session unlocked");
        Ok(Self {
            owner,
            key: Some(key),
        })
    }

    /// A session without a key: legacy entries open, sealed ones stay locked.
    pub fn read_only(owner: impl Into<String>) -> Result<Self> {
        Ok(Self {
            owner: validate_owner(owner.into())?,
            key: None,
        })
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn key(&self) -> Option<&DerivedKey> {
        self.key.as_ref()
    }

    pub fn is_unlocked(&self) -> bool {
        self.key.is_some()
    }

    /// Discard the key.
    pub fn lock(&mut self) {
        self.key = None;
    }

    /// Seal a record, store it, and register its identifier.
    ///
    /// Nothing is visible in the timeline until the registry append
    /// succeeds; a failed attempt can simply be resubmitted.
    ///
    /// # Errors
    ///
    /// Returns `DiaryError::SessionLocked` without a key,
    /// `DiaryError::Validation` for a blank record, and any store or
    /// registry error unchanged.
    pub async fn submit<S, R>(&self, store: &S, registry: &R, record: &DiaryRecord) -> Result<Receipt>
    where
        S: ContentStore + ?Sized,
        R: Registry + ?Sized,
    {
        let key = self.key.as_ref().ok_or(DiaryError::SessionLocked)?;
        record.validate()?;

        let envelope = Envelope::sealed(record, key)?;
        let content_id = store.put(&envelope.to_json()).await.map_err(|e| {
            warn!(error = %e, "envelope upload failed");
            e
        })?;
        let transaction_id = registry.append(&self.owner, &content_id).await.map_err(|e| {
            warn!(id = %content_id, error = %e, "registry append failed");
            e
        })?;

        info!(id = %content_id, tx = %transaction_id, "entry submitted");
        Ok(Receipt {
            content_id,
            transaction_id,
        })
    }

    /// List this owner's entries and hydrate them with the session key.
    ///
    /// # Errors
    ///
    /// Only a registry listing failure is returned; per-entry failures are
    /// contained in the timeline.
    pub async fn timeline<S, R>(&self, store: &S, registry: &R) -> Result<Timeline>
    where
        S: ContentStore + ?Sized,
        R: Registry + ?Sized,
    {
        let stored = registry.list(&self.owner).await?;
        Ok(hydrate(store, &stored, self.key()).await)
    }

    /// Re-run the timeline batch if the key or identifier list changed.
    ///
    /// Returns whether `state` now holds a result from this call.
    pub async fn refresh<S, R>(
        &self,
        state: &mut TimelineState,
        store: &S,
        registry: &R,
    ) -> Result<bool>
    where
        S: ContentStore + ?Sized,
        R: Registry + ?Sized,
    {
        let stored = registry.list(&self.owner).await?;
        let Some(ticket) = state.begin(self.key(), &stored) else {
            return Ok(false);
        };
        let timeline = hydrate(store, &stored, self.key()).await;
        Ok(state.complete(ticket, timeline))
    }
}

fn validate_owner(owner: String) -> Result<String> {
    let trimmed = owner.trim();
    if trimmed.is_empty() {
        return Err(DiaryError::InvalidInput(
            "Wallet address cannot be empty".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryContentStore, MemoryRegistry, StaticWallet};

    #[tokio::test]
    async fn test_authorize_derives_key_from_wallet() {
        let wallet = StaticWallet::new("0xAlice", "0xsig-alice");
        let session = Session::authorize(&wallet).await.unwrap();

        assert!(session.is_unlocked());
        assert_eq!(session.owner(), "0xAlice");
        assert_eq!(
            session.key(),
            Some(&derive_key(&Signature::new("0xsig-alice")))
        );
    }

    #[tokio::test]
    async fn test_declined_signature() {
        let wallet = StaticWallet::declining("0xAlice");
        let result = Session::authorize(&wallet).await;
        assert!(matches!(result, Err(DiaryError::Declined(_))));

        let blank = Session::from_signature("0xAlice", &Signature::new(""));
        assert!(matches!(blank, Err(DiaryError::Declined(_))));
    }

    #[tokio::test]
    async fn test_submit_requires_key() {
        let store = MemoryContentStore::new();
        let registry = MemoryRegistry::new();
        let session = Session::read_only("0xAlice").unwrap();

        let result = session
            .submit(&store, &registry, &DiaryRecord::new("T", "B", ""))
            .await;
        assert!(matches!(result, Err(DiaryError::SessionLocked)));
        assert_eq!(store.blob_count().await, 0);
    }

    #[tokio::test]
    async fn test_submit_rejects_blank_record() {
        let store = MemoryContentStore::new();
        let registry = MemoryRegistry::new();
        let session = Session::from_signature("0xAlice", &Signature::new("sig")).unwrap();

        let result = session
            .submit(&store, &registry, &DiaryRecord::new("", "B", ""))
            .await;
        assert!(matches!(result, Err(DiaryError::Validation(_))));
        assert!(registry.list("0xAlice").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_submit_stores_only_ciphertext() {
        let store = MemoryContentStore::new();
        let registry = MemoryRegistry::new();
        let session = Session::from_signature("0xAlice", &Signature::new("sig")).unwrap();

        let receipt = session
            .submit(&store, &registry, &DiaryRecord::new("Private", "Very secret", "me"))
            .await
            .unwrap();

        let blob = store.fetch(&receipt.content_id).await.unwrap();
        let raw = blob.to_string();
        assert!(!raw.contains("Private"));
        assert!(!raw.contains("Very secret"));
        assert_eq!(blob["encrypted"], serde_json::json!(true));

        let listed = registry.list("0xalice").await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, receipt.content_id);
    }

    #[tokio::test]
    async fn test_failed_upload_registers_nothing() {
        let store = MemoryContentStore::new();
        let registry = MemoryRegistry::new();
        let session = Session::from_signature("0xAlice", &Signature::new("sig")).unwrap();
        let record = DiaryRecord::new("Retry me", "B", "");

        store.fail_put(true);
        let result = session.submit(&store, &registry, &record).await;
        assert!(matches!(result, Err(DiaryError::Storage(_))));
        assert!(registry.list("0xAlice").await.unwrap().is_empty());
        assert_eq!(store.blob_count().await, 0);

        store.fail_put(false);
        let receipt = session.submit(&store, &registry, &record).await.unwrap();
        let listed = registry.list("0xAlice").await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, receipt.content_id);
    }

    #[tokio::test]
    async fn test_failed_append_leaves_timeline_unchanged() {
        let store = MemoryContentStore::new();
        let registry = MemoryRegistry::new();
        let session = Session::from_signature("0xAlice", &Signature::new("sig")).unwrap();
        let record = DiaryRecord::new("Retry me", "B", "");

        registry.fail_append(true);
        let result = session.submit(&store, &registry, &record).await;
        assert!(matches!(result, Err(DiaryError::Storage(_))));

        let timeline = session.timeline(&store, &registry).await.unwrap();
        assert!(timeline.entries.is_empty());
        assert!(timeline.unavailable.is_empty());

        registry.fail_append(false);
        session.submit(&store, &registry, &record).await.unwrap();
        let timeline = session.timeline(&store, &registry).await.unwrap();
        assert_eq!(timeline.entries.len(), 1);
        assert_eq!(timeline.entries[0].record.title, "Retry me");
        assert!(!timeline.entries[0].locked);
    }

    #[tokio::test]
    async fn test_lock_discards_key() {
        let store = MemoryContentStore::new();
        let registry = MemoryRegistry::new();
        let mut session = Session::from_signature("0xAlice", &Signature::new("sig")).unwrap();
        session
            .submit(&store, &registry, &DiaryRecord::new("T", "B", ""))
            .await
            .unwrap();

        session.lock();
        assert!(!session.is_unlocked());

        let timeline = session.timeline(&store, &registry).await.unwrap();
        assert_eq!(timeline.locked_count(), 1);
    }

    #[tokio::test]
    async fn test_refresh_reruns_only_on_change() {
        let store = MemoryContentStore::new();
        let registry = MemoryRegistry::new();
        let session = Session::from_signature("0xAlice", &Signature::new("sig")).unwrap();
        let mut state = TimelineState::new();

        session
            .submit(&store, &registry, &DiaryRecord::new("One", "B", ""))
            .await
            .unwrap();
        assert!(session.refresh(&mut state, &store, &registry).await.unwrap());
        assert!(!session.refresh(&mut state, &store, &registry).await.unwrap());

        session
            .submit(&store, &registry, &DiaryRecord::new("Two", "B", ""))
            .await
            .unwrap();
        assert!(session.refresh(&mut state, &store, &registry).await.unwrap());

        let current = state.current().unwrap();
        assert_eq!(current.entries.len(), 2);
        assert_eq!(current.entries[0].record.title, "Two");
    }
}
