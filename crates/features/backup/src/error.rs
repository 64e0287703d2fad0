use lockbox_crypto::CryptoError;
use lockbox_kernel::config::ConfigError;
use lockbox_secrets::SecretsError;
use std::borrow::Cow;

/// Backup slice error type.
#[derive(Debug, thiserror::Error)]
pub enum BackupError {
    #[error("Snapshot {index} not found{}: archive holds {total}", format_context(.context))]
    SnapshotNotFound { index: usize, total: usize, context: Option<Cow<'static, str>> },

    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: ConfigError, context: Option<Cow<'static, str>> },

    #[error("Crypto error{}: {source}", format_context(.context))]
    Crypto { source: CryptoError, context: Option<Cow<'static, str>> },

    #[error("Secrets error{}: {source}", format_context(.context))]
    Secrets { source: SecretsError, context: Option<Cow<'static, str>> },
}

pub trait BackupErrorExt<T> {
    /// Attaches a human-readable context to the error.
    ///
    /// # Errors
    /// Returns the original error, annotated.
    fn context(self, context: impl Into<Cow<'static, str>>) -> Result<T, BackupError>;
}

impl<T> BackupErrorExt<T> for Result<T, BackupError> {
    #[inline]
    fn context(self, context: impl Into<Cow<'static, str>>) -> Self {
        self.map_err(|mut e| {
            match &mut e {
                BackupError::SnapshotNotFound { context: c, .. }
                | BackupError::Config { context: c, .. }
                | BackupError::Crypto { context: c, .. }
                | BackupError::Secrets { context: c, .. } => *c = Some(context.into()),
            }
            e
        })
    }
}

impl From<ConfigError> for BackupError {
    #[inline]
    fn from(source: ConfigError) -> Self {
        Self::Config { source, context: None }
    }
}

impl<T> BackupErrorExt<T> for Result<T, ConfigError> {
    #[inline]
    fn context(self, context: impl Into<Cow<'static, str>>) -> Result<T, BackupError> {
        self.map_err(|source| BackupError::Config { source, context: Some(context.into()) })
    }
}

impl From<CryptoError> for BackupError {
    #[inline]
    fn from(source: CryptoError) -> Self {
        Self::Crypto { source, context: None }
    }
}

impl<T> BackupErrorExt<T> for Result<T, CryptoError> {
    #[inline]
    fn context(self, context: impl Into<Cow<'static, str>>) -> Result<T, BackupError> {
        self.map_err(|source| BackupError::Crypto { source, context: Some(context.into()) })
    }
}

impl From<SecretsError> for BackupError {
    #[inline]
    fn from(source: SecretsError) -> Self {
        Self::Secrets { source, context: None }
    }
}

impl<T> BackupErrorExt<T> for Result<T, SecretsError> {
    #[inline]
    fn context(self, context: impl Into<Cow<'static, str>>) -> Result<T, BackupError> {
        self.map_err(|source| BackupError::Secrets { source, context: Some(context.into()) })
    }
}

fn format_context(context: &Option<Cow<'static, str>>) -> Cow<'static, str> {
    context.as_ref().map_or(Cow::Borrowed(""), |c| Cow::Owned(format!(" ({c})")))
}
