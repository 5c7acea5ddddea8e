//! Per-entry operations on an initialized vault.
//!
//! `VaultStore` pairs a storage backend with the bootstrap state and
//! exposes `initialize`, `put` and `get`. Each `put`/`get` re-verifies the
//! passphrase, re-derives the passphrase key and unwraps the content key
//! from scratch; nothing key-shaped outlives the call.

use tracing::{debug, warn};
use zeroize::Zeroizing;

use crate::crypto::encryption::{open, seal};
use crate::crypto::hashing;
use crate::crypto::kdf::{self, Argon2Params};
use crate::crypto::keys::SecureKey;
use crate::errors::{LockboxError, Result, StorageError};
use crate::storage::Storage;

use super::state::{VaultPhase, VaultState};
use super::SecretStore;

/// File extension appended to every entry name.
pub const CONTENT_EXTENSION: &str = ".dat";

/// Suffix `FileSystemStorage` adds while a save is in flight.
const TEMP_SUFFIX_LEN: usize = ".tmp".len();

/// Longest accepted entry name, in bytes.
///
/// `<name>.dat.tmp` must still fit in a 255-byte file name.
pub const MAX_NAME_LEN: usize = 255 - CONTENT_EXTENSION.len() - TEMP_SUFFIX_LEN;

/// The main vault handle. Call `initialize` once, then `put`/`get`.
pub struct VaultStore<S: Storage> {
    /// Where artifacts and entries live.
    storage: S,

    /// Bootstrap state (artifacts once loaded).
    state: VaultState,

    /// Argon2 cost used when bootstrapping a new vault.
    params: Argon2Params,
}

impl<S: Storage> VaultStore<S> {
    /// Wrap `storage` with the default Argon2 cost.
    pub fn new(storage: S) -> Self {
        Self::with_params(storage, Argon2Params::default())
    }

    /// Wrap `storage`, bootstrapping new vaults with `params`.
    ///
    /// Existing vaults always use the cost recorded in their password hash.
    pub fn with_params(storage: S, params: Argon2Params) -> Self {
        Self {
            storage,
            state: VaultState::new(),
            params,
        }
    }

    /// Load or create the vault's key material.
    pub fn initialize(&mut self, passphrase: &[u8]) -> Result<()> {
        self.state.initialize(&self.storage, passphrase, &self.params)
    }

    /// Encrypt `content` and store it as entry `name`, replacing any
    /// previous entry of that name.
    pub fn put(&self, passphrase: &[u8], name: &str, content: &[u8]) -> Result<()> {
        validate_entry_name(name)?;
        let content_key = self.unlock(passphrase)?;

        let envelope = seal(content, &content_key)?;
        self.storage.save(&entry_descriptor(name), &envelope)?;

        debug!(entry = name, "stored entry");
        Ok(())
    }

    /// Decrypt and return entry `name`.
    pub fn get(&self, passphrase: &[u8], name: &str) -> Result<Zeroizing<Vec<u8>>> {
        validate_entry_name(name)?;
        let content_key = self.unlock(passphrase)?;

        let envelope = match self.storage.read(&entry_descriptor(name)) {
            Ok(bytes) => bytes,
            Err(StorageError::NotFound(_)) => return Err(LockboxError::NotFound(name.to_string())),
            Err(e) => return Err(e.into()),
        };

        let plaintext = open(&envelope, &content_key).map_err(|e| {
            warn!(entry = name, "entry failed authentication");
            e
        })?;

        debug!(entry = name, "read entry");
        Ok(Zeroizing::new(plaintext))
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> VaultPhase {
        self.state.phase()
    }

    /// The underlying storage backend.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Verify the passphrase and unwrap the content key.
    fn unlock(&self, passphrase: &[u8]) -> Result<SecureKey> {
        let artifacts = self.state.ready()?;

        hashing::verify(&artifacts.password_hash, passphrase)?;

        // Derive with the cost the vault was created with.
        let params = hashing::params_of(&artifacts.password_hash)?;
        let passphrase_key = kdf::derive(passphrase, &artifacts.salt, &params)?;

        let unwrapped = open(&artifacts.encoded_key, &passphrase_key).map_err(|e| {
            warn!("encoded key failed authentication");
            e
        })?;
        SecureKey::from_unwrapped(unwrapped)
    }
}

impl<S: Storage> SecretStore for VaultStore<S> {
    fn initialize(&mut self, passphrase: &[u8]) -> Result<()> {
        VaultStore::initialize(self, passphrase)
    }

    fn put(&self, passphrase: &[u8], name: &str, content: &[u8]) -> Result<()> {
        VaultStore::put(self, passphrase, name, content)
    }

    fn get(&self, passphrase: &[u8], name: &str) -> Result<Zeroizing<Vec<u8>>> {
        VaultStore::get(self, passphrase, name)
    }
}

/// Storage descriptor for an entry: `<name>.dat`.
pub fn entry_descriptor(name: &str) -> String {
    format!("{name}{CONTENT_EXTENSION}")
}

/// Validate that an entry name is safe to use as a file name.
///
/// Allowed: ASCII letters, digits, underscores, hyphens, periods.
/// Must be non-empty and at most `MAX_NAME_LEN` bytes.
fn validate_entry_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(LockboxError::InvalidName("name cannot be empty".into()));
    }
    if name.len() > MAX_NAME_LEN {
        return Err(LockboxError::InvalidName(format!(
            "name cannot exceed {MAX_NAME_LEN} characters"
        )));
    }
    if !name
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-' || b == b'.')
    {
        return Err(LockboxError::InvalidName(format!(
            "'{name}' contains invalid characters — only ASCII letters, digits, underscores, hyphens, and periods are allowed"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    #[test]
    fn entry_descriptor_appends_extension() {
        assert_eq!(entry_descriptor("bank"), "bank.dat");
    }

    #[test]
    fn valid_entry_names() {
        for name in ["bank", "e-mail", "work_vpn", "site.example.com", "A1"] {
            assert!(validate_entry_name(name).is_ok(), "{name}");
        }
    }

    #[test]
    fn invalid_entry_names() {
        for name in ["", "a/b", "../etc", "has space", "ünïcode"] {
            assert!(
                matches!(validate_entry_name(name), Err(LockboxError::InvalidName(_))),
                "{name}"
            );
        }
        assert!(validate_entry_name(&"a".repeat(MAX_NAME_LEN + 1)).is_err());
    }

    #[test]
    fn name_limit_leaves_room_for_extension_and_temp_suffix() {
        assert_eq!(MAX_NAME_LEN, 247);
        assert!(validate_entry_name(&"a".repeat(MAX_NAME_LEN)).is_ok());
    }

    #[test]
    fn put_before_initialize_is_not_initialized() {
        let store = VaultStore::new(MemoryStorage::new());
        let err = store.put(b"pw", "bank", b"x").unwrap_err();
        assert!(matches!(err, LockboxError::NotInitialized));
        assert!(err.is_fatal());
    }

    #[test]
    fn get_before_initialize_is_not_initialized() {
        let store = VaultStore::new(MemoryStorage::new());
        assert!(matches!(
            store.get(b"pw", "bank"),
            Err(LockboxError::NotInitialized)
        ));
    }

    #[test]
    fn invalid_name_checked_before_state() {
        let store = VaultStore::new(MemoryStorage::new());
        assert!(matches!(
            store.get(b"pw", "a/b"),
            Err(LockboxError::InvalidName(_))
        ));
    }
}
