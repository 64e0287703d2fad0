use crate::backend::Backend;
use crate::error::StorageError;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};

/// In-process [`Backend`]. Nothing survives the process.
///
/// Write failures can be switched on to exercise error paths upstream.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: RwLock<BTreeMap<String, String>>,
    fail_writes: AtomicBool,
}

impl MemoryBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// While enabled, every `write` fails with [`StorageError::Unavailable`].
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    #[must_use]
    pub fn entries(&self) -> BTreeMap<String, String> {
        self.entries.read().clone()
    }
}

impl MemoryBackend {
    fn check_writable(&self, what: &str) -> Result<(), StorageError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable {
                message: format!("write to {what} rejected").into(),
                context: None,
            });
        }
        Ok(())
    }
}

impl Backend for MemoryBackend {
    fn write(&self, category: &str, ciphertext: &str) -> Result<(), StorageError> {
        self.check_writable(&format!("'{category}'"))?;
        self.entries.write().insert(category.to_owned(), ciphertext.to_owned());
        Ok(())
    }

    fn read(&self, category: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.read().get(category).cloned())
    }

    fn load_all(&self) -> Result<BTreeMap<String, String>, StorageError> {
        Ok(self.entries())
    }

    fn write_all(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        self.check_writable(&format!("{} entries", entries.len()))?;
        self.entries.write().extend(entries.iter().map(|(k, v)| (k.clone(), v.clone())));
        Ok(())
    }
}
