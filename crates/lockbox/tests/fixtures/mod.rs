#![allow(dead_code)]

use lockbox::prelude::*;
use std::path::Path;
use std::sync::Arc;

pub const KEY: &str = "fixture-passphrase";

pub fn settings() -> Settings {
    let mut settings = Settings::default();
    settings.encryption.key = KEY.to_owned();
    settings.encryption.pool_capacity = 4;
    settings.password.length = 12;
    settings
}

pub fn in_memory() -> (Lockbox, Arc<MemoryBackend>) {
    let backend = Arc::new(MemoryBackend::new());
    let lockbox = Lockbox::builder().settings(settings()).backend(backend.clone()).build().unwrap();
    (lockbox, backend)
}

pub fn on_disk(dir: &Path) -> Lockbox {
    let mut settings = settings();
    settings.storage.path = dir.join("passwords.properties");
    Lockbox::from_settings(settings).unwrap()
}
