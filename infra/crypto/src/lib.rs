//! Symmetric encryption for stored secrets.
//!
//! Cipher engines are expensive to key, so they live in a bounded [`CipherPool`] and are
//! borrowed per operation. [`CryptoManager`] hides the pool behind `encrypt`/`decrypt` and
//! owns key rotation: every [`CryptoManager::reload`] starts a new key epoch with a fresh pool.
//!
//! ## Ciphertext Format
//!
//! ```text
//! base64( AES-256-ECB( PKCS#7( utf8(plaintext) ) ) )
//! ```
//!
//! The AES key is `SHA-256(passphrase)`. The scheme is deterministic and unauthenticated:
//! equal plaintexts produce equal ciphertexts, and decrypting under the wrong key is only
//! noticed when padding or UTF-8 decoding happens to fail.
//!
//! ## Pool Semantics
//!
//! * `borrow` never blocks. When `capacity` handles are in use it fails with
//!   [`CryptoError::PoolExhausted`].
//! * `release` only accepts handles that this pool lent out and that are still outstanding.
//! * [`CipherPool::checkout`] wraps borrow/release in a guard that releases on drop.
//!
//! ## Example
//! ```rust
//! use lockbox_crypto::prelude::*;
//!
//! # fn main() -> Result<(), CryptoError> {
//! let crypto = CryptoManager::new(SecretKey::derive("correct horse")?, 4);
//!
//! let sealed = crypto.encrypt("s3cr3t")?;
//! assert_eq!(crypto.decrypt(&sealed)?, "s3cr3t");
//!
//! crypto.reload(SecretKey::derive("battery staple")?);
//! assert_eq!(crypto.epoch(), 2);
//! # Ok(())
//! # }
//! ```

mod error;
mod handle;
mod key;
mod manager;
mod pool;

pub use error::{CryptoError, CryptoErrorExt};
pub use handle::{CipherHandle, CipherMode};
pub use key::SecretKey;
pub use manager::CryptoManager;
pub use pool::{CipherPool, PooledCipher};

pub mod prelude {
    pub use crate::error::{CryptoError, CryptoErrorExt};
    pub use crate::handle::CipherMode;
    pub use crate::key::SecretKey;
    pub use crate::manager::CryptoManager;
    pub use crate::pool::CipherPool;
}
