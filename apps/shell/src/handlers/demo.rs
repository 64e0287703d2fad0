//! Guided walkthrough on an in-memory backend: build a category tree, snapshot it, tamper with
//! a password and the config, then restore.

use anyhow::{Result, anyhow};
use lockbox::prelude::*;
use std::sync::Arc;

const DEMO_KEY: &str = "demo-passphrase";

/// Settings for the walkthrough. Nothing is read from disk.
#[must_use]
pub fn settings() -> Settings {
    let mut settings = Settings::default();
    settings.encryption.key = DEMO_KEY.to_owned();
    settings.encryption.pool_capacity = 2;
    settings
}

/// # Errors
/// Returns an error if any step of the walkthrough fails.
pub fn run(settings: Settings) -> Result<()> {
    let lockbox =
        Lockbox::builder().settings(settings).backend(Arc::new(MemoryBackend::new())).build()?;
    let backup = lockbox.backup()?;

    let root = build_tree(&lockbox)?;
    for name in ["email", "bank", "wifi"] {
        leaf(&root, name)?.set_password(&lockbox.generate_password()?)?;
    }
    section("Initial state", &lockbox, &root)?;

    let index = backup.take_snapshot();
    println!("📸 Snapshot #{index} taken\n");

    leaf(&root, "email")?.set_password("compromised-password")?;
    lockbox.config().set_password_length(24)?;
    section("After tampering", &lockbox, &root)?;

    let report = backup.restore_snapshot(index)?;
    println!(
        "⏪ Restored snapshot #{index} (replayed: {}, skipped: {}, epoch: {})\n",
        report.replayed.join(", "),
        report.skipped.len(),
        report.epoch
    );
    section("After restore", &lockbox, &root)?;

    let guarded = lockbox.guarded_password_manager(|category| category != "bank")?;
    guarded.save_password("wifi", &lockbox.generate_password()?)?;
    if let Err(err) = guarded.save_password("bank", "blocked-by-verifier") {
        println!("🛑 {err}");
    }
    println!("🚨 Security alerts raised: {}", guarded.alerts());

    let resealed = lockbox.rotate_key("rotated-demo-passphrase")?;
    println!(
        "🔑 Key rotated to epoch {}, re-sealed {} categories",
        lockbox.crypto()?.epoch(),
        resealed.len()
    );

    Ok(())
}

fn build_tree(lockbox: &Lockbox) -> Result<Category> {
    let mut personal = lockbox.group("personal")?;
    personal.add_child(lockbox.category("email")?)?;
    personal.add_child(lockbox.category("bank")?)?;

    let mut root = lockbox.group("vault")?;
    root.add_child(personal)?;
    root.add_child(lockbox.category("wifi")?)?;
    Ok(root)
}

fn leaf<'a>(root: &'a Category, name: &str) -> Result<&'a Category> {
    root.find(name).ok_or_else(|| anyhow!("Category '{name}' missing from the demo tree"))
}

fn section(title: &str, lockbox: &Lockbox, root: &Category) -> Result<()> {
    println!("── {title} ──");
    print!("{}", root.render()?);
    println!("password.length = {}\n", lockbox.config().password_length());
    Ok(())
}
