//! Passphrase-based key derivation using Argon2id.
//!
//! The passphrase key only ever wraps the content key, so it must be
//! reproducible: the same passphrase, salt and parameters always give
//! the same 32 bytes. Parameters come from `Settings` or the defaults.

use argon2::{Algorithm, Argon2, Params, Version};
use rand::RngCore;
use zeroize::Zeroize;

use super::keys::{SecureKey, KEY_LEN};
use crate::errors::{LockboxError, Result};

/// Length of the salt in bytes (256 bits).
pub const SALT_LEN: usize = 32;

/// Minimum safe memory cost in KiB (8 MB).
const MIN_MEMORY_KIB: u32 = 8_192;

/// Configurable Argon2id parameters.
///
/// Shared by the KDF and the password hasher so one config block tunes
/// the cost of both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Argon2Params {
    /// Memory cost in KiB (default: 65 536 = 64 MB).
    pub memory_kib: u32,
    /// Number of iterations (default: 3).
    pub iterations: u32,
    /// Parallelism lanes (default: 4).
    pub parallelism: u32,
}

impl Default for Argon2Params {
    fn default() -> Self {
        Self {
            memory_kib: 65_536,
            iterations: 3,
            parallelism: 4,
        }
    }
}

impl Argon2Params {
    /// Build an `Argon2id` instance, enforcing minimum parameters to
    /// prevent dangerously weak settings.
    pub(crate) fn argon2(&self) -> Result<Argon2<'static>> {
        if self.memory_kib < MIN_MEMORY_KIB {
            return Err(LockboxError::KeyDerivationFailed(format!(
                "Argon2 memory_kib must be at least {MIN_MEMORY_KIB} (got {})",
                self.memory_kib
            )));
        }
        if self.iterations < 1 {
            return Err(LockboxError::KeyDerivationFailed(
                "Argon2 iterations must be at least 1".into(),
            ));
        }
        if self.parallelism < 1 {
            return Err(LockboxError::KeyDerivationFailed(
                "Argon2 parallelism must be at least 1".into(),
            ));
        }

        let params = Params::new(
            self.memory_kib,
            self.iterations,
            self.parallelism,
            Some(KEY_LEN),
        )
        .map_err(|e| LockboxError::KeyDerivationFailed(format!("invalid Argon2 params: {e}")))?;

        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }
}

/// Derive the 32-byte passphrase key from a passphrase and salt.
pub fn derive(passphrase: &[u8], salt: &[u8], params: &Argon2Params) -> Result<SecureKey> {
    let argon2 = params.argon2()?;

    let mut key = [0u8; KEY_LEN];
    argon2
        .hash_password_into(passphrase, salt, &mut key)
        .map_err(|e| LockboxError::KeyDerivationFailed(format!("Argon2id hashing failed: {e}")))?;

    let secure = SecureKey::new(key);
    key.zeroize();
    Ok(secure)
}

/// Generate a cryptographically random 32-byte salt.
pub fn generate_salt() -> [u8; SALT_LEN] {
    let mut salt = [0u8; SALT_LEN];
    rand::rng().fill_bytes(&mut salt);
    salt
}
