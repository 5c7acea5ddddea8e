//! Storage module — the raw byte store underneath the vault.
//!
//! A backend is a flat map from descriptor strings to opaque byte blobs.
//! The vault never interprets anything beyond that, so any backend that
//! honours these three operations can hold a vault:
//! - `FileSystemStorage`: one file per descriptor in a directory (`fs`)
//! - `MemoryStorage`: a `HashMap` (`memory`)

pub mod fs;
pub mod memory;

pub use fs::FileSystemStorage;
pub use memory::MemoryStorage;

use crate::errors::StorageError;

/// Descriptor → bytes persistence.
pub trait Storage {
    /// Write `content` under `descriptor`, replacing anything already there.
    ///
    /// Fails with `EmptyDescriptor` / `EmptyContent` on empty input.
    fn save(&self, descriptor: &str, content: &[u8]) -> Result<(), StorageError>;

    /// Read the bytes stored under `descriptor`.
    ///
    /// Fails with `StorageError::NotFound` when nothing is stored there.
    fn read(&self, descriptor: &str) -> Result<Vec<u8>, StorageError>;

    /// Delete `descriptor`. Best effort: failures are logged, not returned.
    fn remove(&self, descriptor: &str);
}

/// Shared argument checks for `save`.
pub(crate) fn validate_save(descriptor: &str, content: &[u8]) -> Result<(), StorageError> {
    validate_descriptor(descriptor)?;
    if content.is_empty() {
        return Err(StorageError::EmptyContent(descriptor.to_string()));
    }
    Ok(())
}

/// Shared descriptor check: non-empty and a single path component.
pub(crate) fn validate_descriptor(descriptor: &str) -> Result<(), StorageError> {
    if descriptor.is_empty() {
        return Err(StorageError::EmptyDescriptor);
    }
    if descriptor == "." || descriptor == ".." || descriptor.contains(['/', '\\', '\0']) {
        return Err(StorageError::InvalidDescriptor(descriptor.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_descriptor_rejected() {
        assert!(matches!(
            validate_save("", b"x"),
            Err(StorageError::EmptyDescriptor)
        ));
    }

    #[test]
    fn empty_content_rejected() {
        assert!(matches!(
            validate_save(".salt", b""),
            Err(StorageError::EmptyContent(_))
        ));
    }

    #[test]
    fn path_like_descriptors_rejected() {
        for bad in ["..", ".", "a/b", "..\\x", "nul\0"] {
            assert!(
                matches!(validate_descriptor(bad), Err(StorageError::InvalidDescriptor(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn dotted_descriptors_allowed() {
        validate_descriptor(".password_hash").unwrap();
        validate_descriptor("bank.dat").unwrap();
    }
}
