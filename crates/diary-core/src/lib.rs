//! # Diary Core
//!
//! Core library for Dear Diary - a journal whose entries are sealed with a
//! key derived from a wallet signature before they leave the device.
//!
//! This crate provides the key derivation, the envelope codec, and the
//! read-path orchestration, independent of the CLI interface. Wallets,
//! registries, and content stores are reached through traits.
//!
//! ## Architecture
//!
//! - **crypto**: Signature-derived keys and the age cipher
//! - **record**: The plaintext diary record
//! - **envelope**: Encrypted / legacy envelopes, seal and open
//! - **timeline**: Concurrent, failure-tolerant hydration of stored entries
//! - **session**: One unlocked wallet session; write and read paths
//! - **storage**: Collaborator traits plus local and in-memory backends

pub mod crypto;
pub mod envelope;
pub mod error;
pub mod fs;
pub mod record;
pub mod session;
pub mod storage;
pub mod timeline;

pub use crypto::{derive_key, DerivedKey, Signature, SIGNING_MESSAGE};
pub use envelope::{classify, open, seal, unseal, Envelope, EnvelopeKind, Opened};
pub use error::{DecodeFailure, DiaryError, Result};
pub use record::DiaryRecord;
pub use session::Session;
pub use timeline::{hydrate, Timeline, TimelineState};

/// Core version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
