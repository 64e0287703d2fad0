#![allow(dead_code)]

use lockbox_crypto::prelude::*;

pub const PASSPHRASE: &str = "correct horse battery staple";

/// Builds a manager keyed with [`PASSPHRASE`].
/// # Panics
/// * If the fixture passphrase is rejected.
#[must_use]
pub fn setup_crypto(capacity: usize) -> CryptoManager {
    CryptoManager::new(SecretKey::derive(PASSPHRASE).expect("fixture key"), capacity)
}

/// # Panics
/// * If the fixture passphrase is rejected.
#[must_use]
pub fn setup_pool(capacity: usize) -> CipherPool {
    CipherPool::new(SecretKey::derive(PASSPHRASE).expect("fixture key"), capacity)
}
