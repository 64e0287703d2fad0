use crate::error::SecretsError;
use crate::manager::StorageManager;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, warn};

/// Save/load capability that decorators wrap and forward to.
pub trait PasswordManager: Send + Sync + fmt::Debug {
    /// # Errors
    /// Whatever the underlying layer reports.
    fn save_password(&self, category: &str, password: &str) -> Result<(), SecretsError>;

    /// # Errors
    /// Whatever the underlying layer reports.
    fn get_password(&self, category: &str) -> Result<Option<String>, SecretsError>;
}

impl<M: PasswordManager + ?Sized> PasswordManager for Box<M> {
    fn save_password(&self, category: &str, password: &str) -> Result<(), SecretsError> {
        (**self).save_password(category, password)
    }

    fn get_password(&self, category: &str) -> Result<Option<String>, SecretsError> {
        (**self).get_password(category)
    }
}

/// Forwards straight to the [`StorageManager`].
#[derive(Debug, Clone)]
pub struct BasicPasswordManager {
    storage: StorageManager,
}

impl BasicPasswordManager {
    #[must_use]
    pub const fn new(storage: StorageManager) -> Self {
        Self { storage }
    }
}

impl PasswordManager for BasicPasswordManager {
    fn save_password(&self, category: &str, password: &str) -> Result<(), SecretsError> {
        self.storage.save(category, password)
    }

    fn get_password(&self, category: &str) -> Result<Option<String>, SecretsError> {
        self.storage.load(category)
    }
}

type Verifier = dyn Fn(&str) -> bool + Send + Sync;

/// Runs a verification step (a second factor, for instance) before every save.
pub struct VerifyingPasswordManager<M> {
    inner: M,
    verify: Box<Verifier>,
}

impl<M: PasswordManager> VerifyingPasswordManager<M> {
    /// `verify` receives the category name and returns whether the save may proceed.
    pub fn new(inner: M, verify: impl Fn(&str) -> bool + Send + Sync + 'static) -> Self {
        Self { inner, verify: Box::new(verify) }
    }
}

impl<M: fmt::Debug> fmt::Debug for VerifyingPasswordManager<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VerifyingPasswordManager").field("inner", &self.inner).finish_non_exhaustive()
    }
}

impl<M: PasswordManager> PasswordManager for VerifyingPasswordManager<M> {
    fn save_password(&self, category: &str, password: &str) -> Result<(), SecretsError> {
        debug!(category, "Verifying before save");
        if !(self.verify)(category) {
            return Err(SecretsError::VerificationFailed { category: category.to_owned(), context: None });
        }
        self.inner.save_password(category, password)
    }

    fn get_password(&self, category: &str) -> Result<Option<String>, SecretsError> {
        self.inner.get_password(category)
    }
}

/// Raises a security alert for every successful save and every read attempt.
#[derive(Debug)]
pub struct AlertingPasswordManager<M> {
    inner: M,
    alerts: AtomicU64,
}

impl<M: PasswordManager> AlertingPasswordManager<M> {
    pub const fn new(inner: M) -> Self {
        Self { inner, alerts: AtomicU64::new(0) }
    }

    /// Alerts raised so far.
    #[must_use]
    pub fn alerts(&self) -> u64 {
        self.alerts.load(Ordering::Relaxed)
    }

    fn alert(&self, category: &str, event: &'static str) {
        self.alerts.fetch_add(1, Ordering::Relaxed);
        warn!(target: "lockbox::security", category, event, "Security alert");
    }
}

impl<M: PasswordManager> PasswordManager for AlertingPasswordManager<M> {
    fn save_password(&self, category: &str, password: &str) -> Result<(), SecretsError> {
        self.inner.save_password(category, password)?;
        self.alert(category, "modified");
        Ok(())
    }

    fn get_password(&self, category: &str) -> Result<Option<String>, SecretsError> {
        self.alert(category, "accessed");
        self.inner.get_password(category)
    }
}
