use thiserror::Error;

/// Errors raised by a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Descriptor cannot be empty")]
    EmptyDescriptor,

    #[error("Descriptor '{0}' must be a plain file name")]
    InvalidDescriptor(String),

    #[error("Content for '{0}' cannot be empty")]
    EmptyContent(String),

    #[error("Nothing stored under '{0}'")]
    NotFound(String),

    #[error("Storage base path cannot be empty")]
    EmptyBasePath,

    #[error("Storage IO error on '{descriptor}': {source}")]
    Io {
        descriptor: String,
        #[source]
        source: std::io::Error,
    },
}

/// All errors that can occur in Lockbox.
#[derive(Debug, Error)]
pub enum LockboxError {
    // --- Crypto errors ---
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    #[error("Key derivation failed: {0}")]
    KeyDerivationFailed(String),

    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Authentication failed — data was tampered with or corrupted")]
    AuthenticationFailed,

    #[error("Malformed envelope: {0} bytes is shorter than a nonce")]
    MalformedEnvelope(usize),

    // --- Vault errors ---
    #[error("Password hash verification failed")]
    PassphraseRejected,

    #[error("Vault was not initialized")]
    NotInitialized,

    #[error("Vault is corrupted: {0}")]
    Corrupted(String),

    #[error("Unable to store newly generated keys: {0}")]
    BootstrapFailed(String),

    #[error("Entry '{0}' not found")]
    NotFound(String),

    #[error("Invalid entry name: {0}")]
    InvalidName(String),

    // --- Storage errors ---
    #[error(transparent)]
    Storage(#[from] StorageError),

    // --- Config errors ---
    #[error("Config file error: {0}")]
    ConfigError(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),

    #[error("Miss — the two entries do not match")]
    ContentMismatch,
}

impl LockboxError {
    /// Whether this error means the session cannot safely continue.
    ///
    /// Corruption and use-before-initialize stop the process; everything
    /// else is reported and the caller may carry on.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Corrupted(_) | Self::NotInitialized)
    }
}

/// Convenience type alias for Lockbox results.
pub type Result<T> = std::result::Result<T, LockboxError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_corruption_and_uninitialized_are_fatal() {
        assert!(LockboxError::Corrupted("x".into()).is_fatal());
        assert!(LockboxError::NotInitialized.is_fatal());
        assert!(!LockboxError::PassphraseRejected.is_fatal());
        assert!(!LockboxError::AuthenticationFailed.is_fatal());
        assert!(!LockboxError::NotFound("bank".into()).is_fatal());
        assert!(!LockboxError::BootstrapFailed("disk full".into()).is_fatal());
    }

    #[test]
    fn storage_errors_convert() {
        let err: LockboxError = StorageError::EmptyDescriptor.into();
        assert!(matches!(err, LockboxError::Storage(StorageError::EmptyDescriptor)));
        assert_eq!(err.to_string(), "Descriptor cannot be empty");
    }
}
