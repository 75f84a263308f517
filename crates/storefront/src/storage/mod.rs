//! Key-value persistence for client-side state.
//!
//! # Architecture
//!
//! - [`Storage`] is the seam the cart store is written against; it mirrors
//!   browser local storage: string keys, string values, get/set/remove.
//! - [`MemoryStorage`] keeps everything in a shared map (tests, ephemeral use).
//! - [`FileStorage`] keeps the whole key space in one JSON file on disk.
//!
//! All methods take `&self`. Implementations handle their own locking so a
//! single handle can be shared between several stores.

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use thiserror::Error;

/// Errors that can occur when reading or writing storage.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Backing file could not be encoded or decoded.
    #[error("Storage serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A previous writer panicked while holding the lock.
    #[error("Storage lock poisoned")]
    Poisoned,
}

/// String key-value storage.
pub trait Storage {
    /// Read the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete `key`. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

impl<S: Storage + ?Sized> Storage for &S {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_error_display() {
        let err = StorageError::Poisoned;
        assert_eq!(err.to_string(), "Storage lock poisoned");

        let err = StorageError::Io(std::io::Error::other("disk full"));
        assert_eq!(err.to_string(), "Storage I/O error: disk full");
    }

    #[test]
    fn test_storage_through_reference() {
        fn write_through<S: Storage>(storage: S) {
            storage.set("k", "v").unwrap();
        }

        let storage = MemoryStorage::new();
        write_through(&storage);
        assert_eq!(storage.get("k").unwrap().as_deref(), Some("v"));
    }
}
