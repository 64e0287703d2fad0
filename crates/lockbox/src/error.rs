use lockbox_backup::BackupError;
use lockbox_crypto::CryptoError;
use lockbox_kernel::config::ConfigError;
use lockbox_passgen::PassgenError;
use lockbox_secrets::SecretsError;
use lockbox_storage::StorageError;
use std::borrow::Cow;

/// Umbrella error for everything reachable through [`Lockbox`](crate::Lockbox).
#[derive(Debug, thiserror::Error)]
pub enum LockboxError {
    #[error("{source}{}", format_context(.context))]
    Config { source: ConfigError, context: Option<Cow<'static, str>> },

    #[error("{source}{}", format_context(.context))]
    Crypto { source: CryptoError, context: Option<Cow<'static, str>> },

    #[error("{source}{}", format_context(.context))]
    Storage { source: StorageError, context: Option<Cow<'static, str>> },

    #[error("{source}{}", format_context(.context))]
    Secrets { source: SecretsError, context: Option<Cow<'static, str>> },

    #[error("{source}{}", format_context(.context))]
    Backup { source: BackupError, context: Option<Cow<'static, str>> },

    #[error("{source}{}", format_context(.context))]
    Passgen { source: PassgenError, context: Option<Cow<'static, str>> },
}

pub trait LockboxErrorExt<T> {
    /// Attaches a human-readable context to the error.
    ///
    /// # Errors
    /// Returns the original error, annotated.
    fn context(self, context: impl Into<Cow<'static, str>>) -> Result<T, LockboxError>;
}

impl<T> LockboxErrorExt<T> for Result<T, LockboxError> {
    #[inline]
    fn context(self, context: impl Into<Cow<'static, str>>) -> Self {
        self.map_err(|mut e| {
            match &mut e {
                LockboxError::Config { context: c, .. }
                | LockboxError::Crypto { context: c, .. }
                | LockboxError::Storage { context: c, .. }
                | LockboxError::Secrets { context: c, .. }
                | LockboxError::Backup { context: c, .. }
                | LockboxError::Passgen { context: c, .. } => *c = Some(context.into()),
            }
            e
        })
    }
}

macro_rules! wrap_source {
    ($($variant:ident => $source:ty),+ $(,)?) => {$(
        impl From<$source> for LockboxError {
            #[inline]
            fn from(source: $source) -> Self {
                Self::$variant { source, context: None }
            }
        }

        impl<T> LockboxErrorExt<T> for Result<T, $source> {
            #[inline]
            fn context(self, context: impl Into<Cow<'static, str>>) -> Result<T, LockboxError> {
                self.map_err(|source| LockboxError::$variant { source, context: Some(context.into()) })
            }
        }
    )+};
}

wrap_source! {
    Config => ConfigError,
    Crypto => CryptoError,
    Storage => StorageError,
    Secrets => SecretsError,
    Backup => BackupError,
    Passgen => PassgenError,
}

fn format_context(context: &Option<Cow<'static, str>>) -> Cow<'static, str> {
    context.as_ref().map_or(Cow::Borrowed(""), |c| Cow::Owned(format!(" ({c})")))
}
