//! Symmetric key material.
//!
//! Both the content key (the one that actually encrypts entries) and the
//! passphrase key (the one that wraps the content key) live in a
//! `SecureKey`, which wipes its bytes when dropped.

use rand::RngCore;
use zeroize::Zeroize;

use crate::errors::{LockboxError, Result};

/// Length of every symmetric key (256 bits, for AES-256).
pub const KEY_LEN: usize = 32;

/// A 32-byte symmetric key that automatically zeroes its memory when
/// dropped.
#[derive(Zeroize)]
#[zeroize(drop)]
pub struct SecureKey {
    bytes: [u8; KEY_LEN],
}

impl SecureKey {
    /// Create a new `SecureKey` from raw bytes.
    pub fn new(bytes: [u8; KEY_LEN]) -> Self {
        Self { bytes }
    }

    /// Generate a fresh random content key.
    pub fn generate() -> Self {
        let mut bytes = [0u8; KEY_LEN];
        rand::rng().fill_bytes(&mut bytes);
        let key = Self::new(bytes);
        bytes.zeroize();
        key
    }

    /// Rebuild a key from the plaintext of an unwrapped envelope.
    ///
    /// Anything other than exactly `KEY_LEN` bytes means the wrapped key
    /// on disk is damaged. The input buffer is wiped either way.
    pub fn from_unwrapped(mut unwrapped: Vec<u8>) -> Result<Self> {
        if unwrapped.len() != KEY_LEN {
            let len = unwrapped.len();
            unwrapped.zeroize();
            return Err(LockboxError::Corrupted(format!(
                "unwrapped content key is {len} bytes, expected {KEY_LEN}"
            )));
        }

        let mut bytes = [0u8; KEY_LEN];
        bytes.copy_from_slice(&unwrapped);
        unwrapped.zeroize();
        let key = Self::new(bytes);
        bytes.zeroize();
        Ok(key)
    }

    /// Access the raw key bytes.
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }
}

impl std::fmt::Debug for SecureKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SecureKey(..)")
    }
}
