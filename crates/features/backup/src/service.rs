use crate::error::{BackupError, BackupErrorExt};
use lockbox_audit::{AccessLog, AppState};
use lockbox_crypto::{CryptoManager, SecretKey};
use lockbox_kernel::config::{LiveConfig, validate_snapshot};
use lockbox_secrets::StorageManager;
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use tracing::{info, warn};

/// What a successful restore did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestoreReport {
    /// Archive index, or `None` when a detached [`AppState`] was restored.
    pub index: Option<usize>,
    /// Categories whose archived value was written back to the backend.
    pub replayed: Vec<String>,
    /// Categories without a modification entry; left untouched in the backend.
    pub skipped: Vec<String>,
    /// Crypto epoch after the restore.
    pub epoch: u64,
    /// `true` when the archived key differs from the key that was live before the restore.
    pub key_rotated: bool,
}

/// Ordered archive of [`AppState`] captures plus the restore procedure.
#[derive(Debug)]
pub struct BackupService {
    log: Arc<AccessLog>,
    config: LiveConfig,
    crypto: Arc<CryptoManager>,
    storage: StorageManager,
    archive: RwLock<Vec<Arc<AppState>>>,
    restore_lock: Arc<Mutex<()>>,
}

impl BackupService {
    #[must_use]
    pub fn new(
        log: Arc<AccessLog>,
        config: LiveConfig,
        crypto: Arc<CryptoManager>,
        storage: StorageManager,
    ) -> Self {
        Self {
            log,
            config,
            crypto,
            storage,
            archive: RwLock::new(Vec::new()),
            restore_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Serializes restores on `lock` instead of a private one, so that other
    /// operations replacing the key (such as a rotation) cannot interleave with them.
    #[must_use]
    pub fn with_restore_lock(mut self, lock: Arc<Mutex<()>>) -> Self {
        self.restore_lock = lock;
        self
    }

    /// Captures the current log and config and appends it to the archive.
    ///
    /// Returns the index of the new snapshot.
    pub fn take_snapshot(&self) -> usize {
        let state = Arc::new(self.log.capture(self.config.snapshot()));
        let categories = state.history().len();

        let mut archive = self.archive.write();
        archive.push(state);
        let index = archive.len() - 1;

        info!(index, categories, "Snapshot taken");
        index
    }

    #[must_use]
    pub fn snapshot(&self, index: usize) -> Option<Arc<AppState>> {
        self.archive.read().get(index).cloned()
    }

    #[must_use]
    pub fn total_snapshots(&self) -> usize {
        self.archive.read().len()
    }

    /// Rolls log, config, key and backend back to snapshot `index`.
    ///
    /// Concurrent restores are serialized. The index, the archived config and the archived
    /// key are all checked before anything is touched.
    ///
    /// # Errors
    /// * [`BackupError::SnapshotNotFound`] for an index outside the archive. Nothing changes.
    /// * [`BackupError::Config`] / [`BackupError::Crypto`] if the archived config or key is
    ///   unusable. Nothing changes.
    /// * [`BackupError::Secrets`] if replaying into the backend fails. Log, config and key
    ///   are already restored at that point; the backend may be partially replayed.
    pub fn restore_snapshot(&self, index: usize) -> Result<RestoreReport, BackupError> {
        let _serial = self.restore_lock.lock();

        let state = {
            let archive = self.archive.read();
            archive.get(index).cloned().ok_or(BackupError::SnapshotNotFound {
                index,
                total: archive.len(),
                context: None,
            })?
        };

        self.apply(&state, Some(index)).context(format!("Restoring snapshot {index}"))
    }

    /// Restores a state that is not necessarily in the archive, such as one obtained from
    /// [`AccessLog::capture`].
    ///
    /// # Errors
    /// Same as [`BackupService::restore_snapshot`], minus the index lookup.
    pub fn restore(&self, state: &AppState) -> Result<RestoreReport, BackupError> {
        let _serial = self.restore_lock.lock();
        self.apply(state, None)
    }

    fn apply(&self, state: &AppState, index: Option<usize>) -> Result<RestoreReport, BackupError> {
        let archived = state.config();
        validate_snapshot(archived).context("Archived config is invalid")?;
        let key = SecretKey::derive(&archived.encryption_key).context("Archived key is unusable")?;
        let key_rotated = self.config.encryption_key() != archived.encryption_key;

        self.log.replace(state);
        self.config.apply(archived.clone())?;
        self.crypto.reload(key);

        if key_rotated {
            warn!(
                ?index,
                epoch = self.crypto.epoch(),
                "Restored a different key; backend entries outside the snapshot stay sealed under the previous key"
            );
        }

        let outcome = self.storage.replay(&self.log)?;
        let epoch = self.crypto.epoch();

        info!(?index, epoch, replayed = outcome.replayed.len(), key_rotated, "Snapshot restored");

        Ok(RestoreReport {
            index,
            replayed: outcome.replayed,
            skipped: outcome.skipped,
            epoch,
            key_rotated,
        })
    }
}
