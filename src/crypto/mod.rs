//! Cryptographic primitives for Lockbox.
//!
//! This module provides:
//! - Argon2id gatekeeper password hashing (`hashing`)
//! - Argon2id passphrase-to-key derivation (`kdf`)
//! - AES-256-GCM envelope sealing and opening (`encryption`)
//! - Zeroize-on-drop key material (`keys`)

pub mod encryption;
pub mod hashing;
pub mod kdf;
pub mod keys;

pub use encryption::{open, seal};
pub use kdf::{derive, generate_salt, Argon2Params};
pub use keys::SecureKey;
