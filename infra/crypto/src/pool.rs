use crate::error::CryptoError;
use crate::handle::{CipherHandle, CipherMode};
use crate::key::SecretKey;
use parking_lot::Mutex;
use std::collections::{HashSet, VecDeque};
use std::ops::Deref;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, warn};

static NEXT_POOL_ID: AtomicU64 = AtomicU64::new(1);

/// A bounded, non-blocking pool of AES engines bound to one key.
///
/// `available` and `in_use` are disjoint and live behind a single lock together with
/// `capacity`, so borrow, release and resize never observe each other half-done.
#[derive(Debug)]
pub struct CipherPool {
    id: u64,
    key: SecretKey,
    state: Mutex<PoolState>,
}

#[derive(Debug)]
struct PoolState {
    available: VecDeque<CipherHandle>,
    in_use: HashSet<u64>,
    capacity: usize,
}

impl CipherPool {
    /// Creates an empty pool. Handles are built lazily on demand.
    #[must_use]
    pub fn new(key: SecretKey, capacity: usize) -> Self {
        let id = NEXT_POOL_ID.fetch_add(1, Ordering::Relaxed);
        debug!(pool = id, capacity, "Cipher pool created");

        Self {
            id,
            key,
            state: Mutex::new(PoolState {
                available: VecDeque::new(),
                in_use: HashSet::new(),
                capacity,
            }),
        }
    }

    #[must_use]
    pub const fn id(&self) -> u64 {
        self.id
    }

    /// Lends a handle bound to `mode`, reusing an idle one when possible.
    ///
    /// # Errors
    /// * [`CryptoError::PoolExhausted`] when `capacity` handles are already lent out.
    /// * [`CryptoError::InvalidKey`] if a new engine cannot be keyed.
    pub fn borrow(&self, mode: CipherMode) -> Result<CipherHandle, CryptoError> {
        let mut state = self.state.lock();

        if state.in_use.len() >= state.capacity {
            debug!(pool = self.id, in_use = state.in_use.len(), "Cipher pool exhausted");
            return Err(CryptoError::PoolExhausted {
                in_use: state.in_use.len(),
                capacity: state.capacity,
                context: None,
            });
        }

        let handle = match state.available.pop_front() {
            Some(mut handle) => {
                handle.rebind(mode);
                handle
            }
            None => CipherHandle::new(self.id, &self.key, mode)?,
        };

        state.in_use.insert(handle.id());
        debug!(pool = self.id, handle = handle.id(), ?mode, in_use = state.in_use.len(), "Cipher borrowed");
        Ok(handle)
    }

    /// Returns a handle to the idle set.
    ///
    /// # Errors
    /// [`CryptoError::NotOwned`] if the handle belongs to another pool or is not outstanding.
    /// The handle is dropped in that case.
    pub fn release(&self, handle: CipherHandle) -> Result<(), CryptoError> {
        let mut state = self.state.lock();

        if handle.pool_id() != self.id || !state.in_use.remove(&handle.id()) {
            return Err(CryptoError::NotOwned { handle: handle.id(), pool: self.id, context: None });
        }

        debug!(pool = self.id, handle = handle.id(), in_use = state.in_use.len(), "Cipher released");
        state.available.push_back(handle);
        Ok(())
    }

    /// Borrows a handle wrapped in a guard that releases it on drop.
    ///
    /// # Errors
    /// Same as [`CipherPool::borrow`].
    pub fn checkout(&self, mode: CipherMode) -> Result<PooledCipher<'_>, CryptoError> {
        let handle = self.borrow(mode)?;
        Ok(PooledCipher { pool: self, handle: Some(handle) })
    }

    /// Changes the bound for future borrows. Outstanding and idle handles are kept.
    pub fn set_capacity(&self, capacity: usize) {
        self.state.lock().capacity = capacity;
        debug!(pool = self.id, capacity, "Cipher pool resized");
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.state.lock().capacity
    }

    #[must_use]
    pub fn in_use(&self) -> usize {
        self.state.lock().in_use.len()
    }

    #[must_use]
    pub fn available(&self) -> usize {
        self.state.lock().available.len()
    }
}

/// A borrowed handle that goes back to its pool when dropped.
#[derive(Debug)]
pub struct PooledCipher<'a> {
    pool: &'a CipherPool,
    handle: Option<CipherHandle>,
}

impl Deref for PooledCipher<'_> {
    type Target = CipherHandle;

    fn deref(&self) -> &Self::Target {
        // Only `Drop` takes the handle out.
        self.handle.as_ref().unwrap_or_else(|| unreachable!("pooled cipher used after release"))
    }
}

impl Drop for PooledCipher<'_> {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take()
            && let Err(e) = self.pool.release(handle)
        {
            warn!(pool = self.pool.id(), error = %e, "Failed to return cipher to pool");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool(capacity: usize) -> CipherPool {
        CipherPool::new(SecretKey::from_bytes([1u8; 32]), capacity)
    }

    #[test]
    fn released_handles_are_reused() {
        let pool = pool(2);
        let first = pool.borrow(CipherMode::Encrypt).unwrap();
        let id = first.id();
        pool.release(first).unwrap();

        let again = pool.borrow(CipherMode::Decrypt).unwrap();
        assert_eq!(again.id(), id);
        assert_eq!(again.mode(), CipherMode::Decrypt);
    }

    #[test]
    fn guard_releases_on_drop() {
        let pool = pool(1);
        {
            let _guard = pool.checkout(CipherMode::Encrypt).unwrap();
            assert_eq!(pool.in_use(), 1);
            assert!(pool.borrow(CipherMode::Encrypt).is_err());
        }
        assert_eq!(pool.in_use(), 0);
        assert_eq!(pool.available(), 1);
    }

    #[test]
    fn shrinking_capacity_keeps_outstanding_handles() {
        let pool = pool(3);
        let a = pool.borrow(CipherMode::Encrypt).unwrap();
        let b = pool.borrow(CipherMode::Encrypt).unwrap();

        pool.set_capacity(1);
        assert_eq!(pool.in_use(), 2);
        assert!(matches!(pool.borrow(CipherMode::Encrypt), Err(CryptoError::PoolExhausted { .. })));

        pool.release(a).unwrap();
        pool.release(b).unwrap();
        assert!(pool.borrow(CipherMode::Encrypt).is_ok());
    }
}
