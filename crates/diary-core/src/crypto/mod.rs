//! Cryptographic operations for Dear Diary.
//!
//! - **Key derivation**: SHA-256 over a wallet signature of a fixed message
//! - **Cipher**: age passphrase encryption keyed by the derived key
//!
//! ## Threat Model
//!
//! We defend against:
//! - Anyone reading blobs from the public content store
//! - A different wallet reading entries it did not write
//!
//! We do NOT defend against:
//! - A compromised wallet or signing device
//! - Access to an unlocked session / memory

pub mod cipher;
pub mod key;

pub use cipher::{decrypt, encrypt};
pub use key::{derive_key, DerivedKey, Signature, SIGNING_MESSAGE};
