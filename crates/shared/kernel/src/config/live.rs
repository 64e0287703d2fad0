use super::{ConfigError, validate_snapshot};
use lockbox_domain::config::ConfigSnapshot;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::info;

/// Process-wide mutable configuration.
///
/// Cloning is cheap and every clone observes the same state. Reads return an owned
/// [`ConfigSnapshot`]; writes go through validated setters and leave the config untouched
/// when validation fails.
#[derive(Debug, Clone)]
pub struct LiveConfig {
    inner: Arc<RwLock<ConfigSnapshot>>,
}

impl LiveConfig {
    /// # Errors
    /// Returns [`ConfigError::Validation`] if `initial` is invalid.
    pub fn new(initial: ConfigSnapshot) -> Result<Self, ConfigError> {
        validate_snapshot(&initial)?;
        Ok(Self { inner: Arc::new(RwLock::new(initial)) })
    }

    #[must_use]
    pub fn snapshot(&self) -> ConfigSnapshot {
        self.inner.read().clone()
    }

    #[must_use]
    pub fn database_url(&self) -> String {
        self.inner.read().database_url.clone()
    }

    #[must_use]
    pub fn encryption_key(&self) -> String {
        self.inner.read().encryption_key.clone()
    }

    #[must_use]
    pub fn password_length(&self) -> u32 {
        self.inner.read().password_length
    }

    /// # Errors
    /// Returns [`ConfigError::Validation`] if the resulting snapshot is invalid.
    pub fn set_database_url(&self, url: impl Into<String>) -> Result<(), ConfigError> {
        self.update(|s| s.database_url = url.into())
    }

    /// # Errors
    /// Returns [`ConfigError::Validation`] for a blank key.
    pub fn set_encryption_key(&self, key: impl Into<String>) -> Result<(), ConfigError> {
        self.update(|s| s.encryption_key = key.into())
    }

    /// # Errors
    /// Returns [`ConfigError::Validation`] when `length` is below the minimum.
    pub fn set_password_length(&self, length: u32) -> Result<(), ConfigError> {
        self.update(|s| s.password_length = length)
    }

    /// Replaces every field at once.
    ///
    /// # Errors
    /// Returns [`ConfigError::Validation`] if `snapshot` is invalid; nothing is written then.
    pub fn apply(&self, snapshot: ConfigSnapshot) -> Result<(), ConfigError> {
        validate_snapshot(&snapshot)?;
        *self.inner.write() = snapshot;
        info!("Runtime config replaced");
        Ok(())
    }

    // Validation runs on a copy while the write lock is held.
    fn update(&self, mutate: impl FnOnce(&mut ConfigSnapshot)) -> Result<(), ConfigError> {
        let mut guard = self.inner.write();
        let mut candidate = guard.clone();
        mutate(&mut candidate);
        validate_snapshot(&candidate)?;
        *guard = candidate;
        Ok(())
    }
}
