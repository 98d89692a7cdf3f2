//! Error types for Dear Diary core operations.
//!
//! This module defines the error hierarchy for all core operations.
//! Errors are descriptive at the core level; the CLI layer maps these
//! to user-friendly messages and exit codes.

use std::fmt;

use thiserror::Error;

/// Result type alias for diary operations.
pub type Result<T> = std::result::Result<T, DiaryError>;

/// Core error type for diary operations.
#[derive(Debug, Error)]
pub enum DiaryError {
    /// The user refused a signature request
    #[error("Signature request declined: {0}")]
    Declined(String),

    /// The session holds no key
    #[error("Session is locked; sign the unlock message first")]
    SessionLocked,

    /// Ciphertext could not be opened with the available key.
    ///
    /// This is the expected outcome for entries sealed by another wallet
    /// and is contained by the envelope codec.
    #[error("Cannot open entry with this key: {0}")]
    DecodeFailed(DecodeFailure),

    /// Fetching a blob from content storage failed
    #[error("Transport error: {0}")]
    Transport(String),

    /// Storage or registry backend error
    #[error("Storage error: {0}")]
    Storage(String),

    /// Unexpected encryption or decryption error
    #[error("Encryption error: {0}")]
    Crypto(String),

    /// Record validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid user input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// I/O error
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// JSON serialization/deserialization error
    #[error("JSON error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },

    /// Generic error (fallback)
    #[error("{0}")]
    Other(String),
}

impl DiaryError {
    /// Whether this error means "cannot open with this key".
    pub fn is_decode_failure(&self) -> bool {
        matches!(self, DiaryError::DecodeFailed(_))
    }
}

/// Why a ciphertext could not be opened.
///
/// Callers above the codec never branch on the reason; it exists for logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeFailure {
    /// Ciphertext is not valid base64
    NotBase64,
    /// Decoded bytes are not a recognised cipher format
    UnknownFormat,
    /// Key does not unlock the ciphertext
    WrongKey,
    /// Ciphertext failed authentication while reading
    Corrupt,
    /// Cipher produced no output
    Empty,
    /// Plaintext is not UTF-8
    NotUtf8,
    /// Plaintext does not parse as a diary record
    MalformedRecord,
}

impl fmt::Display for DecodeFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            DecodeFailure::NotBase64 => "ciphertext is not base64",
            DecodeFailure::UnknownFormat => "unrecognised ciphertext format",
            DecodeFailure::WrongKey => "wrong key",
            DecodeFailure::Corrupt => "ciphertext is corrupt",
            DecodeFailure::Empty => "empty plaintext",
            DecodeFailure::NotUtf8 => "plaintext is not UTF-8",
            DecodeFailure::MalformedRecord => "plaintext is not a diary record",
        };
        f.write_str(reason)
    }
}
