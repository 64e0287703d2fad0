use lockbox::prelude::*;

/// Prints the live configuration. The encryption key is never shown.
pub fn show(lockbox: &Lockbox) {
    let snapshot = lockbox.config().snapshot();
    let settings = lockbox.settings();

    println!("database.url             {}", snapshot.database_url);
    println!("encryption.key           *** ({} chars)", snapshot.encryption_key.chars().count());
    println!("encryption.pool_capacity {}", settings.encryption.pool_capacity);
    println!("password.length          {}", snapshot.password_length);
    println!("password.generator       {}", settings.password.generator);
    println!("storage.path             {}", settings.storage.path.display());
}
