mod fixtures;

use fixtures::{KEY, in_memory, on_disk, settings};
use lockbox::prelude::*;
use std::sync::{Arc, Barrier};
use std::thread;

#[test]
fn concurrent_first_use_yields_one_crypto_manager() {
    const THREADS: usize = 100;
    let (lockbox, _) = in_memory();
    let barrier = Barrier::new(THREADS);

    let managers: Vec<_> = thread::scope(|s| {
        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                s.spawn(|| {
                    barrier.wait();
                    lockbox.crypto().unwrap()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let first = &managers[0];
    assert!(managers.iter().all(|m| Arc::ptr_eq(m, first)));
    assert_eq!(first.epoch(), 1);
}

#[test]
fn concurrent_first_use_yields_one_backup_service() {
    const THREADS: usize = 100;
    let (lockbox, _) = in_memory();
    let barrier = Barrier::new(THREADS);

    let services: Vec<_> = thread::scope(|s| {
        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                s.spawn(|| {
                    barrier.wait();
                    lockbox.backup().unwrap()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert!(services.iter().all(|s| Arc::ptr_eq(s, &services[0])));
}

#[test]
fn fresh_contexts_are_isolated() {
    let (a, _) = in_memory();
    let (b, _) = in_memory();

    a.storage().unwrap().save("email", "only-in-a").unwrap();

    assert!(!Arc::ptr_eq(&a.crypto().unwrap(), &b.crypto().unwrap()));
    assert_eq!(b.storage().unwrap().load("email").unwrap(), None);
    assert_eq!(b.log().len(), 0);
}

#[test]
fn snapshot_mutate_restore_end_to_end() {
    let (lockbox, _) = in_memory();
    let storage = lockbox.storage().unwrap();
    let backup = lockbox.backup().unwrap();

    storage.save("email", "original-secret").unwrap();
    let before = lockbox.config().snapshot();
    let index = backup.take_snapshot();
    assert_eq!(index, 0);

    storage.save("email", "mutated-secret").unwrap();
    lockbox.config().set_password_length(20).unwrap();
    lockbox.config().set_database_url("jdbc:mysql://elsewhere:3306/lockbox").unwrap();

    let report = backup.restore_snapshot(0).unwrap();

    assert_eq!(report.replayed, vec!["email".to_owned()]);
    assert!(!report.key_rotated);
    assert_eq!(storage.load("email").unwrap().as_deref(), Some("original-secret"));
    assert_eq!(lockbox.config().snapshot(), before);
}

#[test]
fn failed_restore_changes_nothing() {
    let (lockbox, backend) = in_memory();
    let storage = lockbox.storage().unwrap();
    storage.save("email", "value").unwrap();
    let config = lockbox.config().snapshot();
    let stored = backend.entries();

    let err = lockbox.backup().unwrap().restore_snapshot(3).unwrap_err();

    assert!(err.to_string().contains("3"));
    assert_eq!(lockbox.config().snapshot(), config);
    assert_eq!(backend.entries(), stored);
    assert_eq!(storage.load("email").unwrap().as_deref(), Some("value"));
}

#[test]
fn rotate_key_reseals_every_stored_category() {
    let (lockbox, backend) = in_memory();
    let storage = lockbox.storage().unwrap();
    storage.save("email", "secret-one").unwrap();
    storage.save("bank", "secret-two").unwrap();
    let sealed_before = backend.entries();

    let resealed = lockbox.rotate_key("a-brand-new-passphrase").unwrap();

    assert_eq!(resealed, ["bank", "email"]);
    assert_eq!(lockbox.crypto().unwrap().epoch(), 2);
    assert_eq!(lockbox.config().encryption_key(), "a-brand-new-passphrase");
    assert_ne!(backend.entries()["email"], sealed_before["email"]);
    assert_eq!(storage.load("email").unwrap().as_deref(), Some("secret-one"));
    assert_eq!(storage.load("bank").unwrap().as_deref(), Some("secret-two"));
}

#[test]
fn rotate_key_reseals_entries_from_a_previous_process() {
    let dir = tempfile::tempdir().unwrap();
    on_disk(dir.path()).storage().unwrap().save("wifi", "correct-horse").unwrap();

    let reopened = on_disk(dir.path());
    assert_eq!(reopened.log().len(), 0);
    let resealed = reopened.rotate_key("a-brand-new-passphrase").unwrap();

    assert_eq!(resealed, ["wifi"]);
    assert_eq!(reopened.storage().unwrap().load("wifi").unwrap().as_deref(), Some("correct-horse"));

    let mut settings = settings();
    settings.encryption.key = "a-brand-new-passphrase".to_owned();
    settings.storage.path = dir.path().join("passwords.properties");
    let next_process = Lockbox::from_settings(settings).unwrap();
    assert_eq!(next_process.storage().unwrap().load("wifi").unwrap().as_deref(), Some("correct-horse"));
}

#[test]
fn rotate_key_over_undecryptable_entry_changes_nothing() {
    let (lockbox, backend) = in_memory();
    lockbox.storage().unwrap().save("email", "kept").unwrap();
    backend.write("junk", "%%% not base64 %%%").unwrap();
    let stored = backend.entries();

    assert!(matches!(lockbox.rotate_key("a-brand-new-passphrase"), Err(LockboxError::Secrets { .. })));

    assert_eq!(backend.entries(), stored);
    assert_eq!(lockbox.config().encryption_key(), KEY);
    assert_eq!(lockbox.crypto().unwrap().epoch(), 1);
    assert_eq!(lockbox.storage().unwrap().load("email").unwrap().as_deref(), Some("kept"));
}

#[test]
fn concurrent_rotation_and_restore_keep_config_and_backend_in_step() {
    const ROUNDS: usize = 20;
    let (lockbox, backend) = in_memory();
    lockbox.storage().unwrap().save("email", "secret").unwrap();
    let backup = lockbox.backup().unwrap();
    let index = backup.take_snapshot();
    let barrier = Barrier::new(2);

    thread::scope(|s| {
        s.spawn(|| {
            barrier.wait();
            for round in 0..ROUNDS {
                lockbox.rotate_key(&format!("rotated-key-{round}")).unwrap();
            }
        });
        s.spawn(|| {
            barrier.wait();
            for _ in 0..ROUNDS {
                backup.restore_snapshot(index).unwrap();
            }
        });
    });

    let mut settings = settings();
    settings.encryption.key = lockbox.config().encryption_key();
    let follower = Lockbox::builder().settings(settings).backend(backend).build().unwrap();

    assert_eq!(lockbox.storage().unwrap().load("email").unwrap().as_deref(), Some("secret"));
    assert_eq!(follower.storage().unwrap().load("email").unwrap().as_deref(), Some("secret"));
}

#[test]
fn file_backed_context_persists_across_instances() {
    let dir = tempfile::tempdir().unwrap();

    on_disk(dir.path()).storage().unwrap().save("wifi", "correct-horse").unwrap();
    let reopened = on_disk(dir.path());

    assert_eq!(reopened.storage().unwrap().load("wifi").unwrap().as_deref(), Some("correct-horse"));
}

#[test]
fn generated_password_honours_live_length() {
    let (lockbox, _) = in_memory();
    assert_eq!(lockbox.generate_password().unwrap().chars().count(), 12);

    lockbox.config().set_password_length(32).unwrap();
    assert_eq!(lockbox.generate_password().unwrap().chars().count(), 32);
    assert_eq!(lockbox.generator().kind(), GeneratorKind::Alphanumeric);
}

#[test]
fn guarded_manager_verifies_then_alerts() {
    let (lockbox, _) = in_memory();
    let manager = lockbox.guarded_password_manager(|category| category != "locked").unwrap();

    manager.save_password("email", "first-secret").unwrap();
    assert!(manager.save_password("locked", "nope").is_err());
    assert_eq!(manager.get_password("email").unwrap().as_deref(), Some("first-secret"));
    assert_eq!(manager.alerts(), 2);
}

#[test]
fn category_tree_shares_context_storage() {
    let (lockbox, _) = in_memory();
    let mut root = lockbox.group("personal").unwrap();
    root.add_child(lockbox.category("email").unwrap()).unwrap();

    root.find("email").unwrap().set_password("tree-secret").unwrap();

    assert_eq!(lockbox.storage().unwrap().load("email").unwrap().as_deref(), Some("tree-secret"));
    assert_eq!(lockbox.log().history("email").len(), 2);
}
