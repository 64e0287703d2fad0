use lockbox_crypto::CryptoError;
use lockbox_storage::StorageError;
use std::borrow::Cow;

/// Secrets slice error type.
#[derive(Debug, thiserror::Error)]
pub enum SecretsError {
    #[error("Crypto error{}: {source}", format_context(.context))]
    Crypto { source: CryptoError, context: Option<Cow<'static, str>> },

    /// The backend rejected a read or write.
    #[error("Storage error{}: {source}", format_context(.context))]
    Storage { source: StorageError, context: Option<Cow<'static, str>> },

    #[error("Verification failed for category '{category}'{}", format_context(.context))]
    VerificationFailed { category: String, context: Option<Cow<'static, str>> },

    #[error("Invalid category{}: {message}", format_context(.context))]
    InvalidCategory { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

pub trait SecretsErrorExt<T> {
    /// Attaches a human-readable context to the error.
    ///
    /// # Errors
    /// Returns the original error, annotated.
    fn context(self, context: impl Into<Cow<'static, str>>) -> Result<T, SecretsError>;
}

impl<T> SecretsErrorExt<T> for Result<T, SecretsError> {
    #[inline]
    fn context(self, context: impl Into<Cow<'static, str>>) -> Self {
        self.map_err(|mut e| {
            match &mut e {
                SecretsError::Crypto { context: c, .. }
                | SecretsError::Storage { context: c, .. }
                | SecretsError::VerificationFailed { context: c, .. }
                | SecretsError::InvalidCategory { context: c, .. } => *c = Some(context.into()),
            }
            e
        })
    }
}

impl From<CryptoError> for SecretsError {
    #[inline]
    fn from(source: CryptoError) -> Self {
        Self::Crypto { source, context: None }
    }
}

impl<T> SecretsErrorExt<T> for Result<T, CryptoError> {
    #[inline]
    fn context(self, context: impl Into<Cow<'static, str>>) -> Result<T, SecretsError> {
        self.map_err(|source| SecretsError::Crypto { source, context: Some(context.into()) })
    }
}

impl From<StorageError> for SecretsError {
    #[inline]
    fn from(source: StorageError) -> Self {
        Self::Storage { source, context: None }
    }
}

impl<T> SecretsErrorExt<T> for Result<T, StorageError> {
    #[inline]
    fn context(self, context: impl Into<Cow<'static, str>>) -> Result<T, SecretsError> {
        self.map_err(|source| SecretsError::Storage { source, context: Some(context.into()) })
    }
}

fn format_context(context: &Option<Cow<'static, str>>) -> Cow<'static, str> {
    context.as_ref().map_or(Cow::Borrowed(""), |c| Cow::Owned(format!(" ({c})")))
}
