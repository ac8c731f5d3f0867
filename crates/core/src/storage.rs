//! Session storage
//!
//! Key/value storage whose lifetime is tied to one browsing session. The cart
//! store only ever talks to this trait, so a browser tab, a file on disk or an
//! in-memory map can all back it.

use std::{cell::RefCell, collections::BTreeMap, io, rc::Rc};

use thiserror::Error;

/// Errors raised by a session storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Storage is disabled or could not be opened.
    #[error("session storage is unavailable")]
    Unavailable,

    /// The write would exceed the backend's quota.
    #[error("session storage quota exceeded")]
    QuotaExceeded,

    /// The backend failed reading or writing its medium.
    #[error("session storage i/o error")]
    Io(#[from] io::Error),

    /// Any other backend-specific failure.
    #[error("session storage error: {0}")]
    Backend(String),
}

/// Session-scoped string storage.
#[cfg_attr(test, mockall::automock)]
pub trait SessionStorage {
    /// Read the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backend cannot be read.
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backend rejects the write.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backend rejects the delete.
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

/// In-process session storage.
///
/// Clones share the same underlying map, so two stores built over clones of
/// one `MemoryStorage` see each other's writes.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Rc<RefCell<BTreeMap<String, String>>>,
}

impl MemoryStorage {
    /// Create an empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Check whether nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl SessionStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());

        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.entries.borrow_mut().remove(key);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn memory_storage_round_trips_values() -> TestResult {
        let storage = MemoryStorage::new();

        storage.set_item("cart", "[]")?;

        assert_eq!(storage.get_item("cart")?, Some("[]".to_string()));
        assert_eq!(storage.get_item("missing")?, None);

        Ok(())
    }

    #[test]
    fn memory_storage_overwrites_and_removes() -> TestResult {
        let storage = MemoryStorage::new();

        storage.set_item("cart", "first")?;
        storage.set_item("cart", "second")?;

        assert_eq!(storage.get_item("cart")?, Some("second".to_string()));
        assert_eq!(storage.len(), 1);

        storage.remove_item("cart")?;

        assert!(storage.is_empty());

        Ok(())
    }

    #[test]
    fn memory_storage_clones_share_entries() -> TestResult {
        let storage = MemoryStorage::new();
        let shared = storage.clone();

        storage.set_item("cart", "[]")?;

        assert_eq!(shared.get_item("cart")?, Some("[]".to_string()));

        Ok(())
    }
}
