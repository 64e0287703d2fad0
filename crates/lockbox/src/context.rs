use crate::error::{LockboxError, LockboxErrorExt};
use lockbox_audit::AccessLog;
use lockbox_backup::BackupService;
use lockbox_crypto::{CryptoManager, SecretKey};
use lockbox_domain::config::{ConfigSnapshot, Settings};
use lockbox_kernel::config::{LiveConfig, load_settings, validate_settings, validate_snapshot};
use lockbox_passgen::{PasswordGenerator, create_generator, generate_password};
use lockbox_secrets::{
    AlertingPasswordManager, BasicPasswordManager, Category, StorageManager, VerifyingPasswordManager,
};
use lockbox_storage::{Backend, FileBackend};
use parking_lot::Mutex;
use std::path::Path;
use std::sync::{Arc, OnceLock};
use tracing::{debug, info};

mod private {
    pub(super) trait Sealed {}
}

use private::Sealed;

#[derive(Debug)]
pub struct NoSettings;
#[derive(Debug)]
pub struct WithSettings(Settings);

impl Sealed for NoSettings {}
impl Sealed for WithSettings {}

/// Dependency-injection root.
///
/// Owns the one [`LiveConfig`], backend and [`AccessLog`] of a process, and creates the
/// crypto manager, storage manager and backup service on first use. Concurrent first callers
/// all receive the same instance. Tests get isolation by building a fresh context.
#[derive(Debug)]
pub struct Lockbox {
    settings: Settings,
    config: LiveConfig,
    backend: Arc<dyn Backend>,
    log: Arc<AccessLog>,
    crypto: OnceLock<Arc<CryptoManager>>,
    storage: OnceLock<StorageManager>,
    backup: OnceLock<Arc<BackupService>>,
    init_lock: Mutex<()>,
    // Held by key rotation and by every snapshot restore.
    key_lock: Arc<Mutex<()>>,
}

#[allow(private_bounds)]
#[must_use = "LockboxBuilder does nothing until .build() is called"]
#[derive(Debug)]
pub struct LockboxBuilder<S: Sealed = NoSettings> {
    state: S,
    backend: Option<Arc<dyn Backend>>,
}

impl Default for LockboxBuilder<NoSettings> {
    fn default() -> Self {
        Self { state: NoSettings, backend: None }
    }
}

#[allow(private_bounds)]
impl<S: Sealed> LockboxBuilder<S> {
    /// Uses `backend` instead of the file backend described by `storage.path`.
    pub fn backend(mut self, backend: Arc<dyn Backend>) -> Self {
        self.backend = Some(backend);
        self
    }
}

impl LockboxBuilder<NoSettings> {
    pub fn settings(self, settings: Settings) -> LockboxBuilder<WithSettings> {
        LockboxBuilder { state: WithSettings(settings), backend: self.backend }
    }
}

impl LockboxBuilder<WithSettings> {
    /// Validates the settings and wires the context.
    ///
    /// # Errors
    /// - [`LockboxError::Config`] when validation fails; nothing is constructed.
    /// - [`LockboxError::Storage`] when the default file backend cannot be opened.
    pub fn build(self) -> Result<Lockbox, LockboxError> {
        let WithSettings(settings) = self.state;
        validate_settings(&settings).context("Validating settings")?;

        let backend: Arc<dyn Backend> = match self.backend {
            Some(backend) => backend,
            None => Arc::new(
                FileBackend::builder()
                    .path(settings.storage.path.clone())
                    .open()
                    .context("Opening file backend")?,
            ),
        };
        let config = LiveConfig::new(ConfigSnapshot::from(&settings))?;

        info!(
            pool_capacity = settings.encryption.pool_capacity,
            generator = %settings.password.generator,
            "Lockbox context ready"
        );

        Ok(Lockbox {
            settings,
            config,
            backend,
            log: Arc::new(AccessLog::new()),
            crypto: OnceLock::new(),
            storage: OnceLock::new(),
            backup: OnceLock::new(),
            init_lock: Mutex::new(()),
            key_lock: Arc::new(Mutex::new(())),
        })
    }
}

impl Lockbox {
    pub fn builder() -> LockboxBuilder {
        LockboxBuilder::default()
    }

    /// Builds a context on the file backend named by `settings`.
    ///
    /// # Errors
    /// See [`LockboxBuilder::build`].
    pub fn from_settings(settings: Settings) -> Result<Self, LockboxError> {
        Self::builder().settings(settings).build()
    }

    /// Loads settings from `path` (plus `LOCKBOX__*` overrides) and builds a context.
    ///
    /// # Errors
    /// [`LockboxError::Config`] when loading fails, otherwise see [`LockboxBuilder::build`].
    pub fn open(path: Option<impl AsRef<Path>>) -> Result<Self, LockboxError> {
        let settings = load_settings(path).context("Loading settings")?;
        Self::from_settings(settings)
    }

    /// Startup settings as loaded. Runtime changes live in [`Lockbox::config`].
    #[must_use]
    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    #[must_use]
    pub const fn config(&self) -> &LiveConfig {
        &self.config
    }

    #[must_use]
    pub const fn log(&self) -> &Arc<AccessLog> {
        &self.log
    }

    #[must_use]
    pub const fn backend(&self) -> &Arc<dyn Backend> {
        &self.backend
    }

    /// The crypto manager, keyed from the live config on first use.
    ///
    /// # Errors
    /// [`LockboxError::Crypto`] when the configured key cannot be derived.
    pub fn crypto(&self) -> Result<Arc<CryptoManager>, LockboxError> {
        if let Some(crypto) = self.crypto.get() {
            return Ok(Arc::clone(crypto));
        }

        let _guard = self.init_lock.lock();
        if let Some(crypto) = self.crypto.get() {
            return Ok(Arc::clone(crypto));
        }

        let key = SecretKey::derive(&self.config.encryption_key()).context("Deriving encryption key")?;
        let crypto = Arc::new(CryptoManager::new(key, self.settings.encryption.pool_capacity));
        debug!(epoch = crypto.epoch(), "Crypto manager created");

        Ok(Arc::clone(self.crypto.get_or_init(|| crypto)))
    }

    /// # Errors
    /// Whatever [`Lockbox::crypto`] reports.
    pub fn storage(&self) -> Result<StorageManager, LockboxError> {
        if let Some(storage) = self.storage.get() {
            return Ok(storage.clone());
        }

        let crypto = self.crypto()?;
        let _guard = self.init_lock.lock();
        let storage = self.storage.get_or_init(|| {
            debug!("Storage manager created");
            StorageManager::new(crypto, Arc::clone(&self.backend), Arc::clone(&self.log))
        });
        Ok(storage.clone())
    }

    /// # Errors
    /// Whatever [`Lockbox::crypto`] reports.
    pub fn backup(&self) -> Result<Arc<BackupService>, LockboxError> {
        if let Some(backup) = self.backup.get() {
            return Ok(Arc::clone(backup));
        }

        let storage = self.storage()?;
        let crypto = Arc::clone(storage.crypto());
        let _guard = self.init_lock.lock();
        let backup = self.backup.get_or_init(|| {
            debug!("Backup service created");
            Arc::new(
                BackupService::new(Arc::clone(&self.log), self.config.clone(), crypto, storage)
                    .with_restore_lock(Arc::clone(&self.key_lock)),
            )
        });
        Ok(Arc::clone(backup))
    }

    /// Switches to a new encryption key.
    ///
    /// Every backend entry is decrypted under the current key and re-sealed under the new
    /// one, including entries written by earlier processes. The batch is staged in full before
    /// anything is written; the crypto epoch and the config switch only after the backend
    /// accepted it. Rotation and snapshot restores never overlap.
    ///
    /// Returns the re-sealed categories in name order.
    ///
    /// # Errors
    /// - [`LockboxError::Crypto`] or [`LockboxError::Config`] for a blank passphrase; nothing changes.
    /// - [`LockboxError::Secrets`] when a stored entry does not decrypt or the backend rejects
    ///   the batch; key, config and backend stay as they were.
    pub fn rotate_key(&self, passphrase: &str) -> Result<Vec<String>, LockboxError> {
        let key = SecretKey::derive(passphrase).context("Rotating encryption key")?;
        let next = ConfigSnapshot { encryption_key: passphrase.to_owned(), ..self.config.snapshot() };
        validate_snapshot(&next).context("Rotating encryption key")?;
        let storage = self.storage()?;

        let _guard = self.key_lock.lock();
        let resealed = storage.reseal(key).context("Re-sealing after key rotation")?;
        self.config.set_encryption_key(passphrase).context("Rotating encryption key")?;

        info!(epoch = storage.crypto().epoch(), resealed = resealed.len(), "Encryption key rotated");
        Ok(resealed)
    }

    /// # Errors
    /// Whatever [`Lockbox::storage`] reports.
    pub fn password_manager(&self) -> Result<BasicPasswordManager, LockboxError> {
        Ok(BasicPasswordManager::new(self.storage()?))
    }

    /// The base manager wrapped in verification, then alerting.
    ///
    /// # Errors
    /// Whatever [`Lockbox::storage`] reports.
    pub fn guarded_password_manager(
        &self,
        verify: impl Fn(&str) -> bool + Send + Sync + 'static,
    ) -> Result<AlertingPasswordManager<VerifyingPasswordManager<BasicPasswordManager>>, LockboxError>
    {
        let verifying = VerifyingPasswordManager::new(self.password_manager()?, verify);
        Ok(AlertingPasswordManager::new(verifying))
    }

    /// A leaf category bound to this context's storage.
    ///
    /// # Errors
    /// Whatever [`Lockbox::storage`] reports.
    pub fn category(&self, name: impl Into<String>) -> Result<Category, LockboxError> {
        Ok(Category::leaf(name, self.storage()?))
    }

    /// # Errors
    /// Whatever [`Lockbox::storage`] reports.
    pub fn group(&self, name: impl Into<String>) -> Result<Category, LockboxError> {
        Ok(Category::group(name, self.storage()?))
    }

    #[must_use]
    pub fn generator(&self) -> Box<dyn PasswordGenerator> {
        create_generator(self.settings.password.generator)
    }

    /// Generates a password with the configured generator and the live password length.
    ///
    /// # Errors
    /// [`LockboxError::Passgen`] when the length is below the minimum.
    pub fn generate_password(&self) -> Result<String, LockboxError> {
        Ok(generate_password(self.settings.password.generator, self.config.password_length())?)
    }
}
