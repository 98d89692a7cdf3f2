//! Read-path orchestration.
//!
//! [`hydrate`] fetches and opens every stored entry concurrently. One bad
//! entry never fails the batch: a fetch failure drops that entry, a decode
//! failure shows it as a locked placeholder.

use futures::future::join_all;
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::crypto::DerivedKey;
use crate::envelope::{open, Envelope};
use crate::error::DiaryError;
use crate::storage::{ContentId, ContentStore, HydratedEntry, StoredEntry};

/// An entry left out of the timeline, and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Unavailable {
    pub id: ContentId,
    pub reason: String,
}

/// The hydrated view of one owner's entries, newest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Timeline {
    pub entries: Vec<HydratedEntry>,
    pub unavailable: Vec<Unavailable>,
}

impl Timeline {
    pub fn locked_count(&self) -> usize {
        self.entries.iter().filter(|e| e.locked).count()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

enum ItemOutcome {
    Hydrated(HydratedEntry),
    Unavailable(Unavailable),
}

async fn hydrate_one<S>(store: &S, stored: &StoredEntry, key: Option<&DerivedKey>) -> ItemOutcome
where
    S: ContentStore + ?Sized,
{
    let blob = match store.fetch(&stored.id).await {
        Ok(blob) => blob,
        Err(e) => {
            warn!(id = %stored.id, error = %e, "dropping entry: fetch failed");
            return ItemOutcome::Unavailable(Unavailable {
                id: stored.id.clone(),
                reason: e.to_string(),
            });
        }
    };

    let envelope = Envelope::from_json(&blob);
    match open(&envelope, key) {
        Ok(opened) => ItemOutcome::Hydrated(HydratedEntry {
            id: stored.id.clone(),
            recorded_at: stored.recorded_at,
            encrypted: opened.is_encrypted(),
            locked: opened.is_locked(),
            record: opened.into_record(),
        }),
        Err(e) => {
            // open() already turned decode failures into placeholders
            debug_assert!(!matches!(e, DiaryError::DecodeFailed(_)));
            error!(id = %stored.id, error = %e, "dropping entry: unexpected open failure");
            ItemOutcome::Unavailable(Unavailable {
                id: stored.id.clone(),
                reason: e.to_string(),
            })
        }
    }
}

/// Fetch and open stored entries, newest first.
///
/// All fetches run concurrently and the batch waits for every one to
/// settle. Never fails: per-entry problems end up in
/// [`Timeline::unavailable`] or as locked entries.
pub async fn hydrate<S>(store: &S, stored: &[StoredEntry], key: Option<&DerivedKey>) -> Timeline
where
    S: ContentStore + ?Sized,
{
    let key_fingerprint = key
        .map(DerivedKey::fingerprint)
        .unwrap_or_else(|| "none".to_string());
    info!(count = stored.len(), key = %key_fingerprint, "hydrating timeline");

    let outcomes = join_all(
        stored
            .iter()
            .rev()
            .map(|entry| hydrate_one(store, entry, key)),
    )
    .await;

    let mut timeline = Timeline::default();
    for outcome in outcomes {
        match outcome {
            ItemOutcome::Hydrated(entry) => timeline.entries.push(entry),
            ItemOutcome::Unavailable(item) => timeline.unavailable.push(item),
        }
    }

    debug!(
        shown = timeline.entries.len(),
        locked = timeline.locked_count(),
        dropped = timeline.unavailable.len(),
        "timeline hydrated"
    );
    timeline
}

/// Inputs a batch was started from.
#[derive(Debug, Clone, PartialEq, Eq)]
struct BatchInputs {
    key_fingerprint: Option<String>,
    ids: Vec<ContentId>,
}

/// Handle for one hydration batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchTicket {
    generation: u64,
}

/// Tracks which batch result is current.
///
/// A batch is re-run when the key or the identifier list changes. Batches
/// are not cancelled; a result only lands if no newer batch has begun.
#[derive(Debug, Default)]
pub struct TimelineState {
    generation: u64,
    inputs: Option<BatchInputs>,
    current: Option<Timeline>,
}

impl TimelineState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a batch for these inputs.
    ///
    /// Returns `None` when the inputs match the latest batch, so there is
    /// nothing to re-run.
    pub fn begin(&mut self, key: Option<&DerivedKey>, stored: &[StoredEntry]) -> Option<BatchTicket> {
        let inputs = BatchInputs {
            key_fingerprint: key.map(DerivedKey::fingerprint),
            ids: stored.iter().map(|e| e.id.clone()).collect(),
        };
        if self.inputs.as_ref() == Some(&inputs) {
            return None;
        }
        self.generation += 1;
        self.inputs = Some(inputs);
        Some(BatchTicket {
            generation: self.generation,
        })
    }

    /// Install a finished batch.
    ///
    /// Returns `false` (and discards the result) if a newer batch began
    /// after `ticket` was issued.
    pub fn complete(&mut self, ticket: BatchTicket, timeline: Timeline) -> bool {
        if ticket.generation != self.generation {
            debug!(
                stale = ticket.generation,
                latest = self.generation,
                "discarding superseded batch"
            );
            return false;
        }
        self.current = Some(timeline);
        true
    }

    pub fn current(&self) -> Option<&Timeline> {
        self.current.as_ref()
    }

    /// Forget the inputs so the next `begin` always re-runs.
    pub fn invalidate(&mut self) {
        self.inputs = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{derive_key, Signature};
    use crate::storage::MemoryContentStore;
    use chrono::{Duration, TimeZone, Utc};
    use serde_json::json;

    fn stored(id: &str, offset_secs: i64) -> StoredEntry {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        StoredEntry::new(ContentId::new(id), base + Duration::seconds(offset_secs))
    }

    #[tokio::test]
    async fn test_hydrate_reverses_insertion_order() {
        let store = MemoryContentStore::new();
        for (id, title) in [("one", "first"), ("two", "second"), ("three", "third")] {
            store
                .insert(ContentId::new(id), json!({"title": title, "text": "body"}))
                .await;
        }
        let entries = vec![stored("one", 0), stored("two", 10), stored("three", 20)];

        let timeline = hydrate(&store, &entries, None).await;

        let titles: Vec<&str> = timeline.entries.iter().map(|e| e.record.title.as_str()).collect();
        assert_eq!(titles, vec!["third", "second", "first"]);
        assert!(timeline.unavailable.is_empty());
        assert!(timeline.entries.iter().all(|e| !e.encrypted && !e.locked));
    }

    #[tokio::test]
    async fn test_missing_blob_is_dropped() {
        let store = MemoryContentStore::new();
        store
            .insert(ContentId::new("present"), json!({"title": "here"}))
            .await;
        let entries = vec![stored("present", 0), stored("absent", 1)];

        let timeline = hydrate(&store, &entries, None).await;

        assert_eq!(timeline.entries.len(), 1);
        assert_eq!(timeline.unavailable.len(), 1);
        assert_eq!(timeline.unavailable[0].id, ContentId::new("absent"));
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let store = MemoryContentStore::new();
        let timeline = hydrate(&store, &[], None).await;
        assert!(timeline.is_empty());
        assert!(timeline.unavailable.is_empty());
    }

    #[test]
    fn test_state_skips_unchanged_inputs() {
        let key = derive_key(&Signature::new("sig1"));
        let entries = vec![stored("one", 0)];
        let mut state = TimelineState::new();

        assert!(state.begin(Some(&key), &entries).is_some());
        assert!(state.begin(Some(&key), &entries).is_none());

        let more = vec![stored("one", 0), stored("two", 1)];
        assert!(state.begin(Some(&key), &more).is_some());

        let other_key = derive_key(&Signature::new("sig2"));
        assert!(state.begin(Some(&other_key), &more).is_some());
        assert!(state.begin(None, &more).is_some());

        state.invalidate();
        assert!(state.begin(None, &more).is_some());
    }

    #[test]
    fn test_stale_batch_does_not_overwrite_newer() {
        let entries = vec![stored("one", 0)];
        let mut state = TimelineState::new();

        let old_key = derive_key(&Signature::new("old-wallet"));
        let new_key = derive_key(&Signature::new("new-wallet"));
        let stale = state.begin(Some(&old_key), &entries).unwrap();
        let fresh = state.begin(Some(&new_key), &entries).unwrap();

        let fresh_result = Timeline {
            entries: Vec::new(),
            unavailable: vec![Unavailable {
                id: ContentId::new("one"),
                reason: "fresh".to_string(),
            }],
        };
        assert!(state.complete(fresh, fresh_result.clone()));
        assert!(!state.complete(stale, Timeline::default()));
        assert_eq!(state.current(), Some(&fresh_result));
    }
}
