//! Age encryption/decryption keyed by a [`DerivedKey`].
//!
//! The derived key is used as an age passphrase. age's scrypt recipient
//! writes its own salt and nonce into the file header, so the ciphertext is
//! self-describing and needs nothing besides the key to open. The binary
//! age file is base64-encoded into a single string for the JSON envelope.

use std::io::{Read, Write};
use std::iter;

use age::secrecy::SecretString;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use super::key::DerivedKey;
use crate::error::{DecodeFailure, DiaryError, Result};

/// scrypt work factor (log2 N) for sealing, and the most an opened header
/// may demand. The passphrase is already a 256-bit digest.
const SCRYPT_WORK_FACTOR: u8 = 12;

/// Encrypt bytes under a derived key, returning base64 text.
///
/// # Errors
///
/// Returns `DiaryError::Crypto` if the cipher library fails.
pub fn encrypt(data: &[u8], key: &DerivedKey) -> Result<String> {
    let mut recipient = age::scrypt::Recipient::new(SecretString::from(key.as_str().to_owned()));
    recipient.set_work_factor(SCRYPT_WORK_FACTOR);

    let encryptor = age::Encryptor::with_recipients(iter::once(&recipient as &dyn age::Recipient))
        .map_err(|e| DiaryError::Crypto(format!("Failed to create encryptor: {}", e)))?;

    let mut encrypted = Vec::new();
    let mut writer = encryptor
        .wrap_output(&mut encrypted)
        .map_err(|e| DiaryError::Crypto(format!("Failed to create encryptor: {}", e)))?;

    writer
        .write_all(data)
        .map_err(|e| DiaryError::Crypto(format!("Encryption write failed: {}", e)))?;

    writer
        .finish()
        .map_err(|e| DiaryError::Crypto(format!("Encryption finish failed: {}", e)))?;

    Ok(STANDARD.encode(encrypted))
}

/// Decrypt base64 ciphertext under a derived key.
///
/// # Errors
///
/// Returns `DiaryError::DecodeFailed` when the ciphertext cannot be opened
/// with this key (wrong key, corrupt or foreign data, empty output).
/// Any other error is unexpected and reported as `DiaryError::Crypto`.
pub fn decrypt(ciphertext: &str, key: &DerivedKey) -> Result<Vec<u8>> {
    let encrypted = STANDARD
        .decode(ciphertext.trim())
        .map_err(|_| DiaryError::DecodeFailed(DecodeFailure::NotBase64))?;

    let decryptor = age::Decryptor::new(encrypted.as_slice())
        .map_err(|_| DiaryError::DecodeFailed(DecodeFailure::UnknownFormat))?;

    let mut identity = age::scrypt::Identity::new(SecretString::from(key.as_str().to_owned()));
    identity.set_max_work_factor(SCRYPT_WORK_FACTOR);
    let mut reader = decryptor
        .decrypt(iter::once(&identity as &dyn age::Identity))
        .map_err(|e| match e {
            age::DecryptError::NoMatchingKeys
            | age::DecryptError::DecryptionFailed
            | age::DecryptError::KeyDecryptionFailed => {
                DiaryError::DecodeFailed(DecodeFailure::WrongKey)
            }
            age::DecryptError::InvalidHeader
            | age::DecryptError::InvalidMac
            | age::DecryptError::UnknownFormat
            | age::DecryptError::ExcessiveWork { .. } => {
                DiaryError::DecodeFailed(DecodeFailure::Corrupt)
            }
            _ => DiaryError::Crypto(format!("Decryption failed: {}", e)),
        })?;

    let mut decrypted = Vec::new();
    reader
        .read_to_end(&mut decrypted)
        .map_err(|_| DiaryError::DecodeFailed(DecodeFailure::Corrupt))?;

    if decrypted.is_empty() {
        return Err(DiaryError::DecodeFailed(DecodeFailure::Empty));
    }

    Ok(decrypted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{derive_key, Signature};

    fn key(sig: &str) -> DerivedKey {
        derive_key(&Signature::new(sig))
    }

    #[test]
    fn test_encrypt_decrypt_round_trip() {
        let key = key("0xwallet-signature");
        let plaintext = b"Hello, World! This is secret data.";

        let encrypted = encrypt(plaintext, &key).unwrap();
        let decrypted = decrypt(&encrypted, &key).unwrap();

        assert_eq!(decrypted, plaintext);
    }

    #[test]
    fn test_ciphertext_is_base64_text_without_plaintext() {
        let key = key("0xwallet-signature");
        let encrypted = encrypt(b"my secret diary", &key).unwrap();

        assert!(STANDARD.decode(&encrypted).is_ok());
        assert!(!encrypted.contains("secret"));
    }

    #[test]
    fn test_same_plaintext_different_ciphertext() {
        // Salt and nonce are fresh per seal
        let key = key("0xwallet-signature");
        let first = encrypt(b"same plaintext", &key).unwrap();
        let second = encrypt(b"same plaintext", &key).unwrap();

        assert_ne!(first, second);
    }

    #[test]
    fn test_wrong_key_is_decode_failure() {
        let encrypted = encrypt(b"secret data", &key("sig-one")).unwrap();

        let result = decrypt(&encrypted, &key("sig-two"));
        assert!(matches!(
            result,
            Err(DiaryError::DecodeFailed(DecodeFailure::WrongKey))
        ));
    }

    #[test]
    fn test_corrupted_data_is_decode_failure() {
        let key = key("0xwallet-signature");
        let encrypted = encrypt(b"secret data", &key).unwrap();

        let mut bytes = STANDARD.decode(&encrypted).unwrap();
        let len = bytes.len();
        bytes[len - 4] ^= 0xFF;
        let corrupted = STANDARD.encode(bytes);

        let result = decrypt(&corrupted, &key);
        assert!(matches!(result, Err(DiaryError::DecodeFailed(_))));
    }

    #[test]
    fn test_garbage_input_is_decode_failure() {
        let key = key("0xwallet-signature");

        let not_base64 = decrypt("%%% not base64 %%%", &key);
        assert!(matches!(
            not_base64,
            Err(DiaryError::DecodeFailed(DecodeFailure::NotBase64))
        ));

        let not_age = decrypt(&STANDARD.encode(b"U2FsdGVkX1 legacy blob"), &key);
        assert!(matches!(
            not_age,
            Err(DiaryError::DecodeFailed(DecodeFailure::UnknownFormat))
        ));
    }

    #[test]
    fn test_empty_plaintext_is_decode_failure() {
        let key = key("0xwallet-signature");
        let encrypted = encrypt(b"", &key).unwrap();

        let result = decrypt(&encrypted, &key);
        assert!(matches!(
            result,
            Err(DiaryError::DecodeFailed(DecodeFailure::Empty))
        ));
    }

    #[test]
    fn test_header_demanding_more_work_is_rejected() {
        let key = key("0xwallet-signature");
        let mut recipient =
            age::scrypt::Recipient::new(SecretString::from(key.as_str().to_owned()));
        recipient.set_work_factor(SCRYPT_WORK_FACTOR + 1);

        let encryptor =
            age::Encryptor::with_recipients(iter::once(&recipient as &dyn age::Recipient))
                .unwrap();
        let mut sealed = Vec::new();
        let mut writer = encryptor.wrap_output(&mut sealed).unwrap();
        writer.write_all(b"costly to open").unwrap();
        writer.finish().unwrap();

        let result = decrypt(&STANDARD.encode(sealed), &key);
        assert!(matches!(
            result,
            Err(DiaryError::DecodeFailed(DecodeFailure::Corrupt))
        ));
    }
}
