//! Key derivation from wallet signatures.
//!
//! A diary key is the SHA-256 digest of a wallet signature over
//! [`SIGNING_MESSAGE`]. There is no salt: the wallet is the key holder, and
//! re-signing the same message in a later session must reproduce the same
//! key without it ever being persisted.

use secrecy::{ExposeSecret, SecretString};
use sha2::{Digest, Sha256};
use zeroize::Zeroize;

/// The fixed message every session signs.
///
/// Changing this text changes every derived key, which silently locks
/// every entry written under the old text.
pub const SIGNING_MESSAGE: &str =
    "Dear Diary: sign this message to unlock your encrypted entries. This request does not send a transaction.";

/// Length of the hex-encoded key (SHA-256 = 32 bytes = 64 hex chars).
pub const KEY_HEX_LENGTH: usize = 64;

/// A wallet signature over [`SIGNING_MESSAGE`].
///
/// Held in memory only for the session that requested it.
pub struct Signature(SecretString);

impl Signature {
    pub fn new(value: impl Into<String>) -> Self {
        Self(SecretString::from(value.into()))
    }

    /// Whether the signature is empty or whitespace (treated as declined).
    pub fn is_blank(&self) -> bool {
        self.0.expose_secret().trim().is_empty()
    }

    pub(crate) fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl std::fmt::Debug for Signature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Signature").field(&"[REDACTED]").finish()
    }
}

/// Symmetric key material derived from one signature.
///
/// Stored as the lowercase hex digest; zeroized when dropped.
#[derive(Clone, PartialEq, Eq)]
pub struct DerivedKey {
    hex: String,
}

impl DerivedKey {
    /// Get the hex key material.
    ///
    /// Avoid storing or logging this value. Use only for immediate cipher operations.
    pub fn as_str(&self) -> &str {
        &self.hex
    }

    /// A short, non-secret identifier for this key.
    ///
    /// Safe to log; used to detect that the session key changed.
    pub fn fingerprint(&self) -> String {
        let digest = Sha256::digest(self.hex.as_bytes());
        hex::encode(&digest[..4])
    }
}

impl Drop for DerivedKey {
    fn drop(&mut self) {
        self.hex.zeroize();
    }
}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DerivedKey")
            .field("key", &"[REDACTED]")
            .field("fingerprint", &self.fingerprint())
            .finish()
    }
}

/// Derive the diary key for a signature.
///
/// Pure and deterministic: the same signature always yields the same key.
///
/// # Examples
///
/// ```
/// use diary_core::crypto::{derive_key, Signature};
///
/// let a = derive_key(&Signature::new("sig1"));
/// let b = derive_key(&Signature::new("sig1"));
/// assert_eq!(a, b);
/// ```
pub fn derive_key(signature: &Signature) -> DerivedKey {
    let digest = Sha256::digest(signature.expose().as_bytes());
    DerivedKey {
        hex: hex::encode(digest),
    }
}
