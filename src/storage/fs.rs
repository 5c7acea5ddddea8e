//! File-system storage: one file per descriptor under a base directory.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::{validate_descriptor, validate_save, Storage};
use crate::errors::StorageError;

/// Stores each descriptor as `<base_dir>/<descriptor>`.
#[derive(Debug, Clone)]
pub struct FileSystemStorage {
    base_dir: PathBuf,
}

impl FileSystemStorage {
    /// Create a backend rooted at `base_dir`.
    ///
    /// The directory itself is created lazily on the first `save`.
    pub fn new(base_dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let base_dir = base_dir.into();
        if base_dir.as_os_str().is_empty() {
            return Err(StorageError::EmptyBasePath);
        }
        Ok(Self { base_dir })
    }

    /// The directory holding the vault files.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn full_path(&self, descriptor: &str) -> PathBuf {
        self.base_dir.join(descriptor)
    }

    fn io_error(descriptor: &str, source: std::io::Error) -> StorageError {
        StorageError::Io {
            descriptor: descriptor.to_string(),
            source,
        }
    }
}

/// Write `content` to `path`, owner-only on Unix.
fn write_restricted(path: &Path, content: &[u8]) -> std::io::Result<()> {
    fs::write(path, content)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
    }

    Ok(())
}

impl Storage for FileSystemStorage {
    fn save(&self, descriptor: &str, content: &[u8]) -> Result<(), StorageError> {
        validate_save(descriptor, content)?;

        if !self.base_dir.exists() {
            fs::create_dir_all(&self.base_dir).map_err(|e| Self::io_error(descriptor, e))?;
        }

        // Atomic write: write to a temp file, then rename.
        // Same directory, so the rename never crosses file systems.
        let path = self.full_path(descriptor);
        let tmp_path = self.full_path(&format!("{descriptor}.tmp"));

        if let Err(e) = write_restricted(&tmp_path, content)
            .and_then(|()| fs::rename(&tmp_path, &path))
        {
            let _ = fs::remove_file(&tmp_path);
            return Err(Self::io_error(descriptor, e));
        }

        debug!(descriptor, bytes = content.len(), "saved");
        Ok(())
    }

    fn read(&self, descriptor: &str) -> Result<Vec<u8>, StorageError> {
        validate_descriptor(descriptor)?;

        match fs::read(self.full_path(descriptor)) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(StorageError::NotFound(descriptor.to_string()))
            }
            Err(e) => Err(Self::io_error(descriptor, e)),
        }
    }

    fn remove(&self, descriptor: &str) {
        if validate_descriptor(descriptor).is_err() {
            warn!(descriptor, "refusing to remove invalid descriptor");
            return;
        }

        match fs::remove_file(self.full_path(descriptor)) {
            Ok(()) => debug!(descriptor, "removed"),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => warn!(descriptor, error = %e, "failed to remove"),
        }
    }
}
