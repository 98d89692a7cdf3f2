//! The stored representation of a diary entry.
//!
//! An envelope is either sealed (`{"encrypted": true, "ciphertext": "..."}`)
//! or a legacy plaintext object written before encryption existed. The
//! shape is decided once, by [`classify`], before anything else looks at
//! the payload.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tracing::debug;

use crate::crypto::{decrypt, encrypt, DerivedKey};
use crate::error::{DecodeFailure, DiaryError, Result};
use crate::record::{iso_timestamp, DiaryRecord};

/// Title used when a legacy entry has none.
pub const DEFAULT_TITLE: &str = "Untitled";

/// Body used when a legacy entry has none.
pub const DEFAULT_CONTENT: &str = "No content";

const ENCRYPTED_MARKER: &str = "encrypted";
const CIPHERTEXT_FIELD: &str = "ciphertext";

/// Which variant a stored object is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeKind {
    Encrypted,
    Legacy,
}

/// Decide the variant of a stored JSON object.
///
/// Encrypted only when the marker is boolean `true` and a string
/// ciphertext is present; everything else is legacy.
pub fn classify(value: &Value) -> EnvelopeKind {
    let marked = value.get(ENCRYPTED_MARKER).and_then(Value::as_bool) == Some(true);
    let has_ciphertext = value.get(CIPHERTEXT_FIELD).is_some_and(Value::is_string);
    if marked && has_ciphertext {
        EnvelopeKind::Encrypted
    } else {
        EnvelopeKind::Legacy
    }
}

/// Plaintext fields of a legacy entry, all optional.
///
/// Early entries stored the body as `text`; later ones as `content`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl LegacyRecord {
    fn from_value(value: &Value) -> Self {
        let field = |name: &str| {
            value
                .get(name)
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(String::from)
        };
        Self {
            title: field("title"),
            text: field("text"),
            content: field("content"),
            tags: field("tags"),
            timestamp: field("timestamp"),
        }
    }

    /// Fill missing fields with safe defaults.
    pub fn into_record(self) -> DiaryRecord {
        DiaryRecord {
            title: self.title.unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            content: self
                .text
                .or(self.content)
                .unwrap_or_else(|| DEFAULT_CONTENT.to_string()),
            tags: self.tags.unwrap_or_default(),
            timestamp: self
                .timestamp
                .unwrap_or_else(|| iso_timestamp(chrono::Utc::now())),
        }
    }
}

/// A stored diary entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Envelope {
    Encrypted { ciphertext: String },
    Legacy(LegacyRecord),
}

impl Envelope {
    /// Seal a record into an encrypted envelope.
    pub fn sealed(record: &DiaryRecord, key: &DerivedKey) -> Result<Self> {
        Ok(Envelope::Encrypted {
            ciphertext: seal(record, key)?,
        })
    }

    /// Read a stored JSON object.
    pub fn from_json(value: &Value) -> Self {
        match classify(value) {
            EnvelopeKind::Encrypted => Envelope::Encrypted {
                ciphertext: value
                    .get(CIPHERTEXT_FIELD)
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
            },
            EnvelopeKind::Legacy => Envelope::Legacy(LegacyRecord::from_value(value)),
        }
    }

    /// The JSON object handed to content storage.
    pub fn to_json(&self) -> Value {
        match self {
            Envelope::Encrypted { ciphertext } => json!({
                ENCRYPTED_MARKER: true,
                CIPHERTEXT_FIELD: ciphertext,
            }),
            Envelope::Legacy(legacy) => {
                serde_json::to_value(legacy).unwrap_or_else(|_| Value::Object(Map::new()))
            }
        }
    }

    pub fn kind(&self) -> EnvelopeKind {
        match self {
            Envelope::Encrypted { .. } => EnvelopeKind::Encrypted,
            Envelope::Legacy(_) => EnvelopeKind::Legacy,
        }
    }
}

/// Result of opening an envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Opened {
    /// Sealed entry, opened with the right key
    Decrypted(DiaryRecord),
    /// Plaintext entry from before encryption existed
    Legacy(DiaryRecord),
    /// Sealed entry that cannot be opened with the available key
    Locked(DiaryRecord),
}

impl Opened {
    pub fn record(&self) -> &DiaryRecord {
        match self {
            Opened::Decrypted(record) | Opened::Legacy(record) | Opened::Locked(record) => record,
        }
    }

    pub fn into_record(self) -> DiaryRecord {
        match self {
            Opened::Decrypted(record) | Opened::Legacy(record) | Opened::Locked(record) => record,
        }
    }

    pub fn is_locked(&self) -> bool {
        matches!(self, Opened::Locked(_))
    }

    /// Whether the stored entry was sealed (opened or not).
    pub fn is_encrypted(&self) -> bool {
        !matches!(self, Opened::Legacy(_))
    }
}

/// Serialize and encrypt a record.
///
/// # Errors
///
/// Returns `DiaryError::Crypto` if the cipher fails; sealing well-formed
/// input has no expected failure.
pub fn seal(record: &DiaryRecord, key: &DerivedKey) -> Result<String> {
    let canonical = serde_json::to_vec(record)?;
    encrypt(&canonical, key)
}

/// Decrypt and parse a ciphertext.
///
/// # Errors
///
/// Returns `DiaryError::DecodeFailed` for every "cannot open with this key"
/// outcome, including plaintext that does not parse as a record.
pub fn unseal(ciphertext: &str, key: &DerivedKey) -> Result<DiaryRecord> {
    let plaintext = decrypt(ciphertext, key)?;
    let text = String::from_utf8(plaintext)
        .map_err(|_| DiaryError::DecodeFailed(DecodeFailure::NotUtf8))?;
    serde_json::from_str(&text).map_err(|_| DiaryError::DecodeFailed(DecodeFailure::MalformedRecord))
}

/// Open an envelope, degrading to a locked placeholder.
///
/// Legacy envelopes need no key. A sealed envelope with no key, or one the
/// key cannot open, yields [`Opened::Locked`].
///
/// # Errors
///
/// Only unexpected cipher failures are returned; a wrong key never is.
pub fn open(envelope: &Envelope, key: Option<&DerivedKey>) -> Result<Opened> {
    match envelope {
        Envelope::Legacy(legacy) => Ok(Opened::Legacy(legacy.clone().into_record())),
        Envelope::Encrypted { ciphertext } => {
            let Some(key) = key else {
                return Ok(Opened::Locked(DiaryRecord::locked_placeholder()));
            };
            match unseal(ciphertext, key) {
                Ok(record) => Ok(Opened::Decrypted(record)),
                Err(DiaryError::DecodeFailed(reason)) => {
                    debug!(%reason, key = %key.fingerprint(), "entry locked");
                    Ok(Opened::Locked(DiaryRecord::locked_placeholder()))
                }
                Err(e) => Err(e),
            }
        }
    }
}
