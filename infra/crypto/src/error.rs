//! # Crypto Errors
//!
//! [`CryptoError`] covers pool accounting failures as well as cipher and encoding failures.

use std::borrow::Cow;

#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    /// Every handle the pool may lend is already out. Never waits.
    #[error("Cipher pool exhausted{}: {in_use} of {capacity} handles in use", format_context(.context))]
    PoolExhausted { in_use: usize, capacity: usize, context: Option<Cow<'static, str>> },

    /// The released handle is not outstanding in this pool (foreign or already returned).
    #[error("Cipher handle {handle} is not owned by pool {pool}{}", format_context(.context))]
    NotOwned { handle: u64, pool: u64, context: Option<Cow<'static, str>> },

    #[error("Encryption error{}: {message}", format_context(.context))]
    Encryption { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Malformed encoding, bad padding, or non-UTF-8 output.
    ///
    /// A ciphertext produced under another key usually ends up here.
    #[error("Decryption error{}: {message}", format_context(.context))]
    Decryption { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Invalid key{}: {message}", format_context(.context))]
    InvalidKey { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl CryptoError {
    pub(crate) fn encryption(message: impl Into<Cow<'static, str>>) -> Self {
        Self::Encryption { message: message.into(), context: None }
    }

    pub(crate) fn decryption(message: impl Into<Cow<'static, str>>) -> Self {
        Self::Decryption { message: message.into(), context: None }
    }
}

pub trait CryptoErrorExt<T> {
    /// Attaches a human-readable context to the error.
    ///
    /// # Errors
    /// Returns the original error, annotated.
    fn context(self, context: impl Into<Cow<'static, str>>) -> Result<T, CryptoError>;
}

impl<T> CryptoErrorExt<T> for Result<T, CryptoError> {
    #[inline]
    fn context(self, context: impl Into<Cow<'static, str>>) -> Self {
        self.map_err(|mut e| {
            match &mut e {
                CryptoError::PoolExhausted { context: c, .. }
                | CryptoError::NotOwned { context: c, .. }
                | CryptoError::Encryption { context: c, .. }
                | CryptoError::Decryption { context: c, .. }
                | CryptoError::InvalidKey { context: c, .. } => *c = Some(context.into()),
            }
            e
        })
    }
}

fn format_context(context: &Option<Cow<'static, str>>) -> Cow<'static, str> {
    context.as_ref().map_or(Cow::Borrowed(""), |c| Cow::Owned(format!(" ({c})")))
}
