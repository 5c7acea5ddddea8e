//! AES-256-GCM authenticated encryption.
//!
//! Each call to `seal` generates a fresh random 12-byte nonce and
//! prepends it to the ciphertext, so an envelope carries everything
//! `open` needs apart from the key.
//!
//! Layout of an envelope:
//!   [ 12-byte nonce | ciphertext + 16-byte auth tag ]

use aes_gcm::aead::{Aead, KeyInit, OsRng};
use aes_gcm::{AeadCore, Aes256Gcm, Nonce};

use super::keys::SecureKey;
use crate::errors::{LockboxError, Result};

/// Size of the AES-256-GCM nonce in bytes.
pub const NONCE_LEN: usize = 12;

/// Size of the GCM authentication tag in bytes.
pub const TAG_LEN: usize = 16;

/// Encrypt `plaintext` under `key`.
///
/// Returns the nonce prepended to the ciphertext (nonce || ciphertext || tag).
pub fn seal(plaintext: &[u8], key: &SecureKey) -> Result<Vec<u8>> {
    let cipher = Aes256Gcm::new_from_slice(key.as_bytes())
        .map_err(|e| LockboxError::EncryptionFailed(format!("invalid key length: {e}")))?;

    // A fresh nonce per call; reuse under one key would break GCM.
    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);

    let ciphertext = cipher
        .encrypt(&nonce, plaintext)
        .map_err(|e| LockboxError::EncryptionFailed(format!("encryption error: {e}")))?;

    let mut envelope = Vec::with_capacity(NONCE_LEN + ciphertext.len());
    envelope.extend_from_slice(&nonce);
    envelope.extend_from_slice(&ciphertext);
    Ok(envelope)
}

/// Decrypt an envelope produced by `seal`.
///
/// Any modification of nonce, ciphertext or tag fails with
/// `AuthenticationFailed`; no partial plaintext is ever returned.
pub fn open(envelope: &[u8], key: &SecureKey) -> Result<Vec<u8>> {
    if envelope.len() < NONCE_LEN {
        return Err(LockboxError::MalformedEnvelope(envelope.len()));
    }

    let (nonce_bytes, ciphertext) = envelope.split_at(NONCE_LEN);
    let nonce = Nonce::from_slice(nonce_bytes);

    let cipher =
        Aes256Gcm::new_from_slice(key.as_bytes()).map_err(|_| LockboxError::AuthenticationFailed)?;

    cipher
        .decrypt(nonce, ciphertext)
        .map_err(|_| LockboxError::AuthenticationFailed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(byte: u8) -> SecureKey {
        SecureKey::new([byte; 32])
    }

    #[test]
    fn envelope_is_nonce_plus_ciphertext_plus_tag() {
        let envelope = seal(b"hello", &key(1)).unwrap();
        assert_eq!(envelope.len(), NONCE_LEN + 5 + TAG_LEN);
    }

    #[test]
    fn empty_plaintext_seals_and_opens() {
        let envelope = seal(b"", &key(2)).unwrap();
        assert_eq!(envelope.len(), NONCE_LEN + TAG_LEN);
        assert!(open(&envelope, &key(2)).unwrap().is_empty());
    }

    #[test]
    fn nonce_only_envelope_fails_authentication() {
        // Long enough to split, too short to hold a tag.
        let result = open(&[0u8; NONCE_LEN], &key(3));
        assert!(matches!(result, Err(LockboxError::AuthenticationFailed)));
    }

    #[test]
    fn short_envelope_is_malformed() {
        let result = open(&[0u8; NONCE_LEN - 1], &key(3));
        assert!(matches!(result, Err(LockboxError::MalformedEnvelope(11))));
    }
}
