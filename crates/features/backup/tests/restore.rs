use lockbox_audit::AccessLog;
use lockbox_backup::{BackupError, BackupService};
use lockbox_crypto::{CryptoManager, SecretKey};
use lockbox_domain::config::ConfigSnapshot;
use lockbox_kernel::config::LiveConfig;
use lockbox_secrets::StorageManager;
use lockbox_storage::{Backend, MemoryBackend};
use std::sync::Arc;

struct Harness {
    service: BackupService,
    storage: StorageManager,
    config: LiveConfig,
    crypto: Arc<CryptoManager>,
    backend: Arc<MemoryBackend>,
    log: Arc<AccessLog>,
}

fn setup() -> Harness {
    let initial = ConfigSnapshot {
        database_url: "jdbc:mysql://localhost:3306/lockbox".to_owned(),
        encryption_key: "initial-key".to_owned(),
        password_length: 12,
    };
    let config = LiveConfig::new(initial.clone()).unwrap();
    let crypto = Arc::new(CryptoManager::new(SecretKey::derive(&initial.encryption_key).unwrap(), 4));
    let backend = Arc::new(MemoryBackend::new());
    let log = Arc::new(AccessLog::new());
    let storage = StorageManager::new(Arc::clone(&crypto), backend.clone(), Arc::clone(&log));
    let service =
        BackupService::new(Arc::clone(&log), config.clone(), Arc::clone(&crypto), storage.clone());

    Harness { service, storage, config, crypto, backend, log }
}

#[test]
fn restore_rolls_back_values_and_config() {
    let h = setup();
    h.storage.save("email", "original").unwrap();
    let before = h.config.snapshot();

    assert_eq!(h.service.take_snapshot(), 0);

    h.storage.save("email", "changed").unwrap();
    h.config.set_database_url("postgres://elsewhere").unwrap();
    h.config.set_password_length(30).unwrap();
    h.config.set_encryption_key("rotated-key").unwrap();
    h.crypto.reload(SecretKey::derive("rotated-key").unwrap());

    let report = h.service.restore_snapshot(0).unwrap();

    assert_eq!(h.storage.load("email").unwrap().as_deref(), Some("original"));
    assert_eq!(h.config.snapshot(), before);
    assert_eq!(report.replayed, ["email"]);
    assert!(report.key_rotated);
    assert_eq!(report.epoch, h.crypto.epoch());
}

#[test]
fn out_of_range_restore_changes_nothing() {
    let h = setup();
    h.storage.save("email", "value").unwrap();
    h.service.take_snapshot();
    h.storage.save("email", "newer").unwrap();

    let config_before = h.config.snapshot();
    let history_before = h.log.history("email");
    let stored_before = h.backend.entries();
    let epoch_before = h.crypto.epoch();

    let err = h.service.restore_snapshot(1).unwrap_err();
    assert!(matches!(err, BackupError::SnapshotNotFound { index: 1, total: 1, .. }));

    assert_eq!(h.config.snapshot(), config_before);
    assert_eq!(h.log.history("email"), history_before);
    assert_eq!(h.backend.entries(), stored_before);
    assert_eq!(h.crypto.epoch(), epoch_before);
    assert_eq!(h.storage.load("email").unwrap().as_deref(), Some("newer"));
}

#[test]
fn restore_on_empty_archive_is_not_found() {
    let h = setup();
    assert!(matches!(h.service.restore_snapshot(0), Err(BackupError::SnapshotNotFound { total: 0, .. })));
}

#[test]
fn snapshots_are_isolated_from_later_activity() {
    let h = setup();
    h.storage.save("email", "v1").unwrap();
    h.service.take_snapshot();
    h.storage.save("email", "v2").unwrap();
    h.storage.save("bank", "b1").unwrap();
    h.service.take_snapshot();

    assert_eq!(h.service.total_snapshots(), 2);
    let first = h.service.snapshot(0).unwrap();
    assert_eq!(first.history()["email"].len(), 1);
    assert!(!first.history().contains_key("bank"));
    assert!(h.service.snapshot(2).is_none());
}

#[test]
fn restore_replaces_log_and_does_not_append() {
    let h = setup();
    h.storage.save("email", "v1").unwrap();
    h.service.take_snapshot();
    h.storage.save("email", "v2").unwrap();
    h.storage.load("email").unwrap();

    h.service.restore_snapshot(0).unwrap();

    assert_eq!(h.log.history("email").len(), 1);
}

#[test]
fn categories_created_after_snapshot_keep_their_backend_value() {
    let h = setup();
    h.storage.save("email", "v1").unwrap();
    h.service.take_snapshot();
    h.storage.save("bank", "later").unwrap();

    let report = h.service.restore_snapshot(0).unwrap();

    assert!(!report.key_rotated);
    assert!(h.backend.read("bank").unwrap().is_some());
    assert_eq!(h.storage.load("bank").unwrap().as_deref(), Some("later"));
    assert_eq!(h.log.history("bank").len(), 1, "only the consultation just made");
}

#[test]
fn read_only_categories_are_skipped() {
    let h = setup();
    h.backend.write("bank", &h.crypto.encrypt("seeded").unwrap()).unwrap();
    h.storage.load("bank").unwrap();
    h.storage.save("email", "v1").unwrap();
    h.service.take_snapshot();

    let report = h.service.restore_snapshot(0).unwrap();

    assert_eq!(report.replayed, ["email"]);
    assert_eq!(report.skipped, ["bank"]);
    assert_eq!(h.storage.load("bank").unwrap().as_deref(), Some("seeded"));
}

#[test]
fn detached_state_can_be_restored() {
    let h = setup();
    h.storage.save("email", "captured").unwrap();
    let state = h.log.capture(h.config.snapshot());

    h.storage.save("email", "later").unwrap();
    h.config.set_encryption_key("rotated-key").unwrap();
    h.crypto.reload(SecretKey::derive("rotated-key").unwrap());

    let report = h.service.restore(&state).unwrap();

    assert_eq!(report.index, None);
    assert!(report.key_rotated);
    assert_eq!(h.config.encryption_key(), "initial-key");
    assert_eq!(h.storage.load("email").unwrap().as_deref(), Some("captured"));
    assert_eq!(h.service.total_snapshots(), 0);
}

#[test]
fn archived_restore_reports_its_index() {
    let h = setup();
    h.storage.save("email", "first").unwrap();
    h.service.take_snapshot();
    h.service.take_snapshot();

    assert_eq!(h.service.restore_snapshot(1).unwrap().index, Some(1));
}
