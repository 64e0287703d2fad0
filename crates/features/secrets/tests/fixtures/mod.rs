#![allow(dead_code)]

use lockbox_audit::AccessLog;
use lockbox_crypto::{CryptoManager, SecretKey};
use lockbox_secrets::StorageManager;
use lockbox_storage::MemoryBackend;
use std::sync::Arc;

pub struct Harness {
    pub storage: StorageManager,
    pub backend: Arc<MemoryBackend>,
    pub log: Arc<AccessLog>,
    pub crypto: Arc<CryptoManager>,
}

/// Wires a storage manager over an in-memory backend.
/// # Panics
/// * If the fixture key is rejected.
#[must_use]
pub fn setup() -> Harness {
    let crypto = Arc::new(CryptoManager::new(SecretKey::derive("fixture-key").expect("fixture key"), 4));
    let backend = Arc::new(MemoryBackend::new());
    let log = Arc::new(AccessLog::new());
    let storage = StorageManager::new(Arc::clone(&crypto), backend.clone(), Arc::clone(&log));

    Harness { storage, backend, log, crypto }
}
