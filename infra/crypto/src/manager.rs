use crate::error::CryptoError;
use crate::handle::{CipherHandle, CipherMode};
use crate::key::SecretKey;
use crate::pool::CipherPool;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use parking_lot::RwLock;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, info};

/// One key and the pool keyed with it.
#[derive(Debug)]
struct KeyEpoch {
    number: u64,
    pool: Arc<CipherPool>,
}

/// Encrypt/decrypt facade over a [`CipherPool`] with wholesale key rotation.
///
/// Each call pins the epoch that is current when it starts and runs to completion
/// against it, even if [`CryptoManager::reload`] swaps in a new epoch meanwhile.
#[derive(Debug)]
pub struct CryptoManager {
    current: RwLock<Arc<KeyEpoch>>,
    capacity: AtomicUsize,
}

impl CryptoManager {
    #[must_use]
    pub fn new(key: SecretKey, capacity: usize) -> Self {
        let pool = Arc::new(CipherPool::new(key, capacity));
        info!(epoch = 1, pool = pool.id(), capacity, "Crypto manager initialized");

        Self {
            current: RwLock::new(Arc::new(KeyEpoch { number: 1, pool })),
            capacity: AtomicUsize::new(capacity),
        }
    }

    /// Encrypts UTF-8 text and returns standard base64.
    ///
    /// # Errors
    /// * [`CryptoError::PoolExhausted`] if no handle is free.
    /// * [`CryptoError::Encryption`] on cipher failure. The handle is released first.
    pub fn encrypt(&self, plaintext: &str) -> Result<String, CryptoError> {
        let epoch = self.pin();
        let cipher = epoch.pool.checkout(CipherMode::Encrypt)?;
        let sealed = cipher.encrypt(plaintext.as_bytes())?;
        debug!(epoch = epoch.number, handle = cipher.id(), "Encrypted value");
        Ok(STANDARD.encode(sealed))
    }

    /// Reverses [`CryptoManager::encrypt`].
    ///
    /// # Errors
    /// * [`CryptoError::PoolExhausted`] if no handle is free.
    /// * [`CryptoError::Decryption`] for bad base64, a bad block layout, bad padding, or
    ///   non-UTF-8 output. A value sealed under another key usually fails here.
    pub fn decrypt(&self, ciphertext: &str) -> Result<String, CryptoError> {
        let raw = STANDARD
            .decode(ciphertext.trim())
            .map_err(|e| CryptoError::decryption(format!("invalid base64: {e}")))?;

        let epoch = self.pin();
        let cipher = epoch.pool.checkout(CipherMode::Decrypt)?;
        let opened = cipher.decrypt(&raw)?;
        debug!(epoch = epoch.number, handle = cipher.id(), "Decrypted value");

        String::from_utf8(opened).map_err(|_| CryptoError::decryption("plaintext is not valid UTF-8"))
    }

    /// Encrypts under `key` without touching the live epoch, for staging a rotation before
    /// it is committed with [`CryptoManager::reload`].
    ///
    /// # Errors
    /// [`CryptoError::Encryption`] on cipher failure.
    pub fn encrypt_with(key: &SecretKey, plaintext: &str) -> Result<String, CryptoError> {
        let handle = CipherHandle::new(0, key, CipherMode::Encrypt)?;
        Ok(STANDARD.encode(handle.encrypt(plaintext.as_bytes())?))
    }

    /// Starts a new key epoch with a fresh pool.
    ///
    /// The previous pool is left as is; calls already running finish on it.
    pub fn reload(&self, key: SecretKey) {
        let mut current = self.current.write();
        let capacity = self.capacity.load(Ordering::Acquire);
        let pool = Arc::new(CipherPool::new(key, capacity));

        let number = current.number + 1;
        info!(epoch = number, pool = pool.id(), capacity, "Key rotated");
        *current = Arc::new(KeyEpoch { number, pool });
    }

    /// Resizes the live pool and every pool created by later reloads.
    ///
    /// Serialized with [`CryptoManager::reload`], so the live pool always ends up with the
    /// capacity stored last.
    pub fn set_pool_capacity(&self, capacity: usize) {
        let current = self.current.write();
        self.capacity.store(capacity, Ordering::Release);
        current.pool.set_capacity(capacity);
    }

    #[must_use]
    pub fn epoch(&self) -> u64 {
        self.current.read().number
    }

    /// The pool of the current epoch.
    #[must_use]
    pub fn pool(&self) -> Arc<CipherPool> {
        Arc::clone(&self.current.read().pool)
    }

    fn pin(&self) -> Arc<KeyEpoch> {
        Arc::clone(&self.current.read())
    }
}
