//! In-memory storage, used by tests and by embedders that bring their
//! own persistence.

use std::cell::RefCell;
use std::collections::HashMap;

use super::{validate_descriptor, validate_save, Storage};
use crate::errors::StorageError;

/// A `HashMap`-backed store with the same validation rules as the
/// file-system backend.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    blobs: RefCell<HashMap<String, Vec<u8>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if something is stored under `descriptor`.
    pub fn contains(&self, descriptor: &str) -> bool {
        self.blobs.borrow().contains_key(descriptor)
    }

    /// Number of stored descriptors.
    pub fn len(&self) -> usize {
        self.blobs.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.blobs.borrow().is_empty()
    }
}

impl Storage for MemoryStorage {
    fn save(&self, descriptor: &str, content: &[u8]) -> Result<(), StorageError> {
        validate_save(descriptor, content)?;
        self.blobs
            .borrow_mut()
            .insert(descriptor.to_string(), content.to_vec());
        Ok(())
    }

    fn read(&self, descriptor: &str) -> Result<Vec<u8>, StorageError> {
        validate_descriptor(descriptor)?;
        self.blobs
            .borrow()
            .get(descriptor)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(descriptor.to_string()))
    }

    fn remove(&self, descriptor: &str) {
        self.blobs.borrow_mut().remove(descriptor);
    }
}
