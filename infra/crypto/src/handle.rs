use crate::error::CryptoError;
use crate::key::SecretKey;
use aes::Aes256;
use cipher::block_padding::Pkcs7;
use cipher::{BlockDecrypt, BlockEncrypt, KeyInit};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// AES block size in bytes.
pub(crate) const BLOCK_LEN: usize = 16;

static NEXT_HANDLE_ID: AtomicU64 = AtomicU64::new(1);

/// Direction a handle is currently bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CipherMode {
    Encrypt,
    Decrypt,
}

/// One keyed AES-256 engine lent out by a [`CipherPool`](crate::CipherPool).
///
/// Handles are only created by a pool and carry the id of that pool, so a pool can
/// refuse handles it never lent.
pub struct CipherHandle {
    id: u64,
    pool_id: u64,
    mode: CipherMode,
    engine: Aes256,
}

impl CipherHandle {
    pub(crate) fn new(pool_id: u64, key: &SecretKey, mode: CipherMode) -> Result<Self, CryptoError> {
        let engine = Aes256::new_from_slice(key.as_bytes()).map_err(|_| CryptoError::InvalidKey {
            message: "AES-256 requires a 32-byte key".into(),
            context: None,
        })?;

        Ok(Self { id: NEXT_HANDLE_ID.fetch_add(1, Ordering::Relaxed), pool_id, mode, engine })
    }

    pub(crate) const fn rebind(&mut self, mode: CipherMode) {
        self.mode = mode;
    }

    #[must_use]
    pub const fn id(&self) -> u64 {
        self.id
    }

    #[must_use]
    pub const fn pool_id(&self) -> u64 {
        self.pool_id
    }

    #[must_use]
    pub const fn mode(&self) -> CipherMode {
        self.mode
    }

    /// Pads with PKCS#7 and encrypts block by block.
    ///
    /// # Errors
    /// Returns [`CryptoError::Encryption`] if the handle is bound to [`CipherMode::Decrypt`].
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>, CryptoError> {
        if self.mode != CipherMode::Encrypt {
            return Err(CryptoError::encryption("handle is bound to decrypt mode"));
        }
        Ok(self.engine.encrypt_padded_vec::<Pkcs7>(plaintext))
    }

    /// Decrypts and strips PKCS#7 padding.
    ///
    /// # Errors
    /// Returns [`CryptoError::Decryption`] if the handle is bound to [`CipherMode::Encrypt`],
    /// the input is not a whole number of blocks, or the padding is invalid.
    pub fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>, CryptoError> {
        if self.mode != CipherMode::Decrypt {
            return Err(CryptoError::decryption("handle is bound to encrypt mode"));
        }
        if ciphertext.is_empty() || !ciphertext.len().is_multiple_of(BLOCK_LEN) {
            return Err(CryptoError::decryption(format!(
                "ciphertext length {} is not a positive multiple of {BLOCK_LEN}",
                ciphertext.len()
            )));
        }
        self.engine
            .decrypt_padded_vec::<Pkcs7>(ciphertext)
            .map_err(|_| CryptoError::decryption("invalid padding"))
    }
}

impl fmt::Debug for CipherHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CipherHandle")
            .field("id", &self.id)
            .field("pool_id", &self.pool_id)
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}
