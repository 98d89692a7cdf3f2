//! Diary records and the presentation types built from them.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{DiaryError, Result};

/// Title shown for an entry that could not be opened.
pub const LOCKED_TITLE: &str = "Encrypted Entry";

/// Tag marking an entry that could not be opened.
pub const LOCKED_TAG: &str = "locked";

/// Explanation shown in place of a locked entry's body.
pub const LOCKED_CONTENT: &str =
    "This entry is encrypted and cannot be opened with the connected wallet. Sign in with the wallet that wrote it to read it.";

/// The plaintext unit a user writes.
///
/// Field order is the canonical serialized form sealed into envelopes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiaryRecord {
    pub title: String,
    pub content: String,
    /// Comma-delimited tags, as typed
    pub tags: String,
    /// ISO-8601 write time
    pub timestamp: String,
}

impl DiaryRecord {
    /// Create a record stamped with the current time.
    pub fn new(title: impl Into<String>, content: impl Into<String>, tags: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            tags: tags.into(),
            timestamp: iso_timestamp(Utc::now()),
        }
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = iso_timestamp(timestamp);
        self
    }

    /// The synthetic record shown for an entry that could not be opened.
    pub fn locked_placeholder() -> Self {
        Self::new(LOCKED_TITLE, LOCKED_CONTENT, LOCKED_TAG)
    }

    /// Individual tags, trimmed, empties dropped.
    pub fn tag_list(&self) -> Vec<String> {
        self.tags
            .split(',')
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .map(String::from)
            .collect()
    }

    /// Parse the timestamp, if it is valid ISO-8601.
    pub fn parsed_timestamp(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.timestamp)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }

    /// Check the record is fit to seal.
    ///
    /// # Errors
    ///
    /// Returns `DiaryError::Validation` if the title or content is blank.
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(DiaryError::Validation("Title cannot be empty".to_string()));
        }
        if self.content.trim().is_empty() {
            return Err(DiaryError::Validation(
                "Content cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Format a time the way records store it (millisecond precision, `Z`).
pub fn iso_timestamp(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Join individual tags into the stored comma-delimited form.
pub fn join_tags<S: AsRef<str>>(tags: &[S]) -> String {
    tags.iter()
        .map(|tag| tag.as_ref().trim())
        .filter(|tag| !tag.is_empty())
        .collect::<Vec<_>>()
        .join(",")
}
