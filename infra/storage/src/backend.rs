use crate::error::StorageError;
use std::collections::BTreeMap;
use std::fmt::Debug;

/// Durable mapping from category name to ciphertext.
pub trait Backend: Send + Sync + Debug {
    /// Stores `ciphertext` under `category`, replacing any previous value.
    ///
    /// # Errors
    /// Returns a [`StorageError`] if the value could not be persisted.
    fn write(&self, category: &str, ciphertext: &str) -> Result<(), StorageError>;

    /// Returns the ciphertext stored under `category`, or `None` if there is none.
    ///
    /// # Errors
    /// Returns a [`StorageError`] if the store could not be read.
    fn read(&self, category: &str) -> Result<Option<String>, StorageError>;

    /// Every stored entry, ordered by category name.
    ///
    /// # Errors
    /// Returns a [`StorageError`] if the store could not be read.
    fn load_all(&self) -> Result<BTreeMap<String, String>, StorageError>;

    /// Stores several entries at once. Implementations that can do so apply the batch
    /// atomically; the default writes one entry at a time.
    ///
    /// # Errors
    /// Returns a [`StorageError`] if any value could not be persisted.
    fn write_all(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        entries.iter().try_for_each(|(category, ciphertext)| self.write(category, ciphertext))
    }
}
