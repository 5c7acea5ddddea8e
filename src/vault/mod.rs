//! Vault module — passphrase-protected entry storage.
//!
//! This module provides:
//! - The bootstrap state machine over the three key artifacts (`state`)
//! - `VaultStore`, the put/get facade used by the front end (`store`)

pub mod state;
pub mod store;

pub use state::{VaultPhase, VaultState};
pub use store::VaultStore;

use zeroize::Zeroizing;

use crate::errors::Result;

/// What the front end needs from a vault.
///
/// Every call takes the passphrase; implementations must not cache
/// anything derived from it between calls.
pub trait SecretStore {
    /// Load existing key material or bootstrap a new vault.
    fn initialize(&mut self, passphrase: &[u8]) -> Result<()>;

    /// Encrypt and store `content` under `name`.
    fn put(&self, passphrase: &[u8], name: &str, content: &[u8]) -> Result<()>;

    /// Decrypt and return the content stored under `name`.
    fn get(&self, passphrase: &[u8], name: &str) -> Result<Zeroizing<Vec<u8>>>;
}
