//! The vault's bootstrap state machine.
//!
//! Three artifacts make up a vault's key material on disk:
//!
//! ```text
//! .password_hash   Argon2id PHC string gating every operation
//! .salt            KDF salt for the passphrase key
//! .encoded_key     content key sealed under the passphrase key
//! ```
//!
//! They are created together and must be present or absent together.
//! Any mix of present and missing artifacts is corruption: the state
//! moves to `Corrupted` and stays there for the life of the process.

use tracing::{debug, error, info, warn};

use crate::crypto::encryption::seal;
use crate::crypto::hashing;
use crate::crypto::kdf::{self, generate_salt, Argon2Params};
use crate::crypto::keys::SecureKey;
use crate::errors::{LockboxError, Result, StorageError};
use crate::storage::Storage;

/// Descriptor of the gatekeeper password hash.
pub const PASSWORD_HASH_DESCRIPTOR: &str = ".password_hash";

/// Descriptor of the KDF salt.
pub const SALT_DESCRIPTOR: &str = ".salt";

/// Descriptor of the wrapped content key.
pub const ENCODED_KEY_DESCRIPTOR: &str = ".encoded_key";

/// All three bootstrap descriptors, in write order.
pub const BOOTSTRAP_DESCRIPTORS: [&str; 3] = [
    PASSWORD_HASH_DESCRIPTOR,
    SALT_DESCRIPTOR,
    ENCODED_KEY_DESCRIPTOR,
];

/// Externally visible lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VaultPhase {
    /// Nothing loaded yet (or the last `initialize` failed recoverably).
    Unloaded,
    /// Artifacts loaded or created; entries can be read and written.
    Ready,
    /// Artifacts are desynchronized. Terminal.
    Corrupted,
}

/// The persisted key material, as loaded into memory.
#[derive(Clone, PartialEq, Eq)]
pub struct Artifacts {
    pub password_hash: Vec<u8>,
    pub salt: Vec<u8>,
    pub encoded_key: Vec<u8>,
}

impl std::fmt::Debug for Artifacts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Artifacts")
            .field("password_hash_len", &self.password_hash.len())
            .field("salt_len", &self.salt.len())
            .field("encoded_key_len", &self.encoded_key.len())
            .finish()
    }
}

#[derive(Debug)]
enum Phase {
    Unloaded,
    Ready(Artifacts),
    Corrupted(String),
}

/// Owns the in-memory copy of the bootstrap artifacts.
#[derive(Debug)]
pub struct VaultState {
    phase: Phase,
}

impl Default for VaultState {
    fn default() -> Self {
        Self::new()
    }
}

impl VaultState {
    pub fn new() -> Self {
        Self {
            phase: Phase::Unloaded,
        }
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> VaultPhase {
        match self.phase {
            Phase::Unloaded => VaultPhase::Unloaded,
            Phase::Ready(_) => VaultPhase::Ready,
            Phase::Corrupted(_) => VaultPhase::Corrupted,
        }
    }

    /// The loaded artifacts, or the reason they are unavailable.
    pub fn ready(&self) -> Result<&Artifacts> {
        match &self.phase {
            Phase::Ready(artifacts) => Ok(artifacts),
            Phase::Unloaded => Err(LockboxError::NotInitialized),
            Phase::Corrupted(reason) => Err(LockboxError::Corrupted(reason.clone())),
        }
    }

    /// Load the vault's artifacts from `storage`, or create them on first run.
    ///
    /// A wrong passphrase or an unreadable artifact leaves the state
    /// untouched. Desynchronized artifacts move the state to `Corrupted`
    /// for good. A failed
    /// bootstrap rolls back whatever it wrote and leaves the state
    /// `Unloaded` so the caller can retry.
    pub fn initialize<S: Storage + ?Sized>(
        &mut self,
        storage: &S,
        passphrase: &[u8],
        params: &Argon2Params,
    ) -> Result<()> {
        if let Phase::Corrupted(reason) = &self.phase {
            return Err(LockboxError::Corrupted(reason.clone()));
        }

        // 1. Gate on the stored hash, if there is one.
        let password_hash = read_optional(storage, PASSWORD_HASH_DESCRIPTOR)?;
        if let Some(stored) = &password_hash {
            if let Err(e) = hashing::verify(stored, passphrase) {
                if let LockboxError::Corrupted(reason) = &e {
                    self.corrupt(reason.clone());
                }
                return Err(e);
            }
        }

        // 2. The other two artifacts are read independently.
        let salt = read_optional(storage, SALT_DESCRIPTOR)?;
        let encoded_key = read_optional(storage, ENCODED_KEY_DESCRIPTOR)?;

        // 3. All or nothing.
        if let Err(reason) = check_consistency(
            password_hash.is_some(),
            salt.is_some(),
            encoded_key.is_some(),
        ) {
            self.corrupt(reason.to_string());
            return Err(LockboxError::Corrupted(reason.to_string()));
        }

        match (password_hash, salt, encoded_key) {
            (Some(password_hash), Some(salt), Some(encoded_key)) => {
                // 5. Adopt as-is; keys are only derived when entries are touched.
                debug!("loaded existing vault artifacts");
                self.phase = Phase::Ready(Artifacts {
                    password_hash,
                    salt,
                    encoded_key,
                });
                Ok(())
            }
            _ => {
                if let Phase::Ready(_) = self.phase {
                    let reason = "vault artifacts disappeared after load";
                    self.corrupt(reason.to_string());
                    return Err(LockboxError::Corrupted(reason.to_string()));
                }

                // 4. First run.
                let artifacts = generate(passphrase, params)
                    .map_err(|e| LockboxError::BootstrapFailed(e.to_string()))?;
                store_group(storage, &artifacts)?;
                info!("created new vault");
                self.phase = Phase::Ready(artifacts);
                Ok(())
            }
        }
    }

    fn corrupt(&mut self, reason: String) {
        error!(%reason, "vault is corrupted");
        self.phase = Phase::Corrupted(reason);
    }
}

/// Read a descriptor, mapping "not stored" to `None`.
fn read_optional<S: Storage + ?Sized>(storage: &S, descriptor: &str) -> Result<Option<Vec<u8>>> {
    match storage.read(descriptor) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(StorageError::NotFound(_)) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Presence check for the three artifacts.
fn check_consistency(
    has_hash: bool,
    has_salt: bool,
    has_key: bool,
) -> std::result::Result<(), &'static str> {
    if has_salt != has_key {
        Err("salt and encoded key are desynchronized")
    } else if has_key && !has_hash {
        Err("password hash is lost")
    } else if !has_key && has_hash {
        Err("encoded key is lost")
    } else {
        Ok(())
    }
}

/// Fresh key material for a new vault.
fn generate(passphrase: &[u8], params: &Argon2Params) -> Result<Artifacts> {
    let password_hash = hashing::hash(passphrase, params)?;

    let content_key = SecureKey::generate();
    let salt = generate_salt();
    let passphrase_key = kdf::derive(passphrase, &salt, params)?;
    let encoded_key = seal(content_key.as_bytes(), &passphrase_key)?;

    Ok(Artifacts {
        password_hash,
        salt: salt.to_vec(),
        encoded_key,
    })
}

/// Persist the three artifacts as a group, removing all of them if any
/// single write fails.
fn store_group<S: Storage + ?Sized>(storage: &S, artifacts: &Artifacts) -> Result<()> {
    let outcome = storage
        .save(PASSWORD_HASH_DESCRIPTOR, &artifacts.password_hash)
        .and_then(|()| storage.save(SALT_DESCRIPTOR, &artifacts.salt))
        .and_then(|()| storage.save(ENCODED_KEY_DESCRIPTOR, &artifacts.encoded_key));

    if let Err(e) = outcome {
        warn!(error = %e, "bootstrap write failed, rolling back");
        for descriptor in BOOTSTRAP_DESCRIPTORS {
            storage.remove(descriptor);
        }
        return Err(LockboxError::BootstrapFailed(e.to_string()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consistent_presence_passes() {
        assert!(check_consistency(false, false, false).is_ok());
        assert!(check_consistency(true, true, true).is_ok());
    }

    #[test]
    fn salt_without_key_is_desync() {
        assert_eq!(
            check_consistency(true, true, false),
            Err("salt and encoded key are desynchronized")
        );
        assert_eq!(
            check_consistency(false, false, true),
            Err("salt and encoded key are desynchronized")
        );
    }

    #[test]
    fn missing_hash_is_reported() {
        assert_eq!(
            check_consistency(false, true, true),
            Err("password hash is lost")
        );
    }

    #[test]
    fn hash_alone_is_reported() {
        assert_eq!(
            check_consistency(true, false, false),
            Err("encoded key is lost")
        );
    }

    #[test]
    fn fresh_state_is_unloaded() {
        let state = VaultState::new();
        assert_eq!(state.phase(), VaultPhase::Unloaded);
        assert!(matches!(state.ready(), Err(LockboxError::NotInitialized)));
    }

    #[test]
    fn artifacts_debug_hides_bytes() {
        let artifacts = Artifacts {
            password_hash: vec![1; 4],
            salt: vec![2; 32],
            encoded_key: vec![3; 60],
        };
        let shown = format!("{artifacts:?}");
        assert!(shown.contains("salt_len: 32"));
        assert!(!shown.contains("[2, 2"));
    }
}
