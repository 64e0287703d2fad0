use crate::error::{SecretsError, SecretsErrorExt};
use lockbox_audit::AccessLog;
use lockbox_crypto::{CryptoManager, SecretKey};
use lockbox_domain::access::AccessAction;
use lockbox_storage::Backend;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Encrypted save/load by category name, mirrored into the access log.
///
/// Cloning shares the same crypto facade, backend and log.
#[derive(Debug, Clone)]
pub struct StorageManager {
    crypto: Arc<CryptoManager>,
    backend: Arc<dyn Backend>,
    log: Arc<AccessLog>,
    // Shared by save/load, exclusive for reseal.
    gate: Arc<RwLock<()>>,
}

/// Result of [`StorageManager::replay`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReplayOutcome {
    /// Categories whose latest modification was written back.
    pub replayed: Vec<String>,
    /// Categories with no modification entry. Their backend value was left alone.
    pub skipped: Vec<String>,
}

impl StorageManager {
    #[must_use]
    pub fn new(crypto: Arc<CryptoManager>, backend: Arc<dyn Backend>, log: Arc<AccessLog>) -> Self {
        Self { crypto, backend, log, gate: Arc::new(RwLock::new(())) }
    }

    #[must_use]
    pub fn log(&self) -> &Arc<AccessLog> {
        &self.log
    }

    #[must_use]
    pub fn crypto(&self) -> &Arc<CryptoManager> {
        &self.crypto
    }

    /// Encrypts `plaintext` and stores it under `category`.
    ///
    /// The modification is logged only after the backend accepted the write.
    ///
    /// # Errors
    /// * [`SecretsError::InvalidCategory`] for a blank name.
    /// * [`SecretsError::Crypto`] if encryption fails.
    /// * [`SecretsError::Storage`] if the backend write fails.
    pub fn save(&self, category: &str, plaintext: &str) -> Result<(), SecretsError> {
        ensure_name(category)?;
        let _shared = self.gate.read();

        let ciphertext = self.crypto.encrypt(plaintext).context(format!("Encrypting '{category}'"))?;
        self.backend.write(category, &ciphertext).context(format!("Writing '{category}'"))?;
        self.log.record(category, plaintext, AccessAction::Modification);

        debug!(category, "Secret saved");
        Ok(())
    }

    /// Loads and decrypts the value stored under `category`.
    ///
    /// Returns `Ok(None)` without logging when nothing is stored.
    ///
    /// # Errors
    /// * [`SecretsError::Storage`] if the backend read fails.
    /// * [`SecretsError::Crypto`] if the stored value does not decrypt under the current key.
    pub fn load(&self, category: &str) -> Result<Option<String>, SecretsError> {
        let _shared = self.gate.read();
        let Some(ciphertext) = self.backend.read(category).context(format!("Reading '{category}'"))?
        else {
            debug!(category, "No stored secret");
            return Ok(None);
        };

        let plaintext = self.crypto.decrypt(&ciphertext).context(format!("Decrypting '{category}'"))?;
        self.log.record(category, plaintext.as_str(), AccessAction::Consultation);

        debug!(category, "Secret loaded");
        Ok(Some(plaintext))
    }

    /// Writes the latest modification of every category in `log` back to the backend,
    /// encrypted under the current key.
    ///
    /// Nothing is appended to any log. Stops at the first failure.
    ///
    /// # Errors
    /// [`SecretsError::Crypto`] or [`SecretsError::Storage`], annotated with the category.
    pub fn replay(&self, log: &AccessLog) -> Result<ReplayOutcome, SecretsError> {
        let _shared = self.gate.read();
        let mut outcome = ReplayOutcome::default();

        for category in log.categories() {
            let Some(value) = log.last_modification(&category) else {
                outcome.skipped.push(category);
                continue;
            };

            let ciphertext =
                self.crypto.encrypt(value.expose()).context(format!("Replaying '{category}'"))?;
            self.backend.write(&category, &ciphertext).context(format!("Replaying '{category}'"))?;
            outcome.replayed.push(category);
        }

        info!(
            replayed = outcome.replayed.len(),
            skipped = outcome.skipped.len(),
            epoch = self.crypto.epoch(),
            "Access log replayed into backend"
        );
        Ok(outcome)
    }

    /// Moves every stored entry to `key` and makes it the current key.
    ///
    /// All entries are decrypted under the current epoch and re-encrypted under `key` before
    /// anything is written. The batch then goes to the backend in one call and the crypto
    /// manager is reloaded. Saves and loads through this manager wait until it is done.
    ///
    /// Returns the resealed categories in name order.
    ///
    /// # Errors
    /// * [`SecretsError::Crypto`] if a stored entry does not decrypt under the current key.
    ///   Nothing is written and the key stays as it was.
    /// * [`SecretsError::Storage`] if the backend cannot be listed or rejects the batch.
    ///   The key stays as it was.
    pub fn reseal(&self, key: SecretKey) -> Result<Vec<String>, SecretsError> {
        let _exclusive = self.gate.write();

        let stored = self.backend.load_all().context("Listing stored secrets")?;
        let mut batch = BTreeMap::new();
        for (category, ciphertext) in stored {
            let plaintext =
                self.crypto.decrypt(&ciphertext).context(format!("Unsealing '{category}'"))?;
            let sealed = CryptoManager::encrypt_with(&key, &plaintext)
                .context(format!("Resealing '{category}'"))?;
            batch.insert(category, sealed);
        }

        self.backend.write_all(&batch).context("Writing resealed secrets")?;
        self.crypto.reload(key);

        info!(resealed = batch.len(), epoch = self.crypto.epoch(), "Stored secrets resealed");
        Ok(batch.into_keys().collect())
    }
}

fn ensure_name(category: &str) -> Result<(), SecretsError> {
    if category.trim().is_empty() {
        return Err(SecretsError::InvalidCategory {
            message: "category name must not be blank".into(),
            context: None,
        });
    }
    Ok(())
}
