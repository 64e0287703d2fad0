use anyhow::{Result, bail};
use lockbox::features::passgen::{generate_password, parse_kind};
use lockbox::prelude::*;

/// Stores `value` (or a freshly generated password) under `category`.
///
/// # Errors
/// Returns an error if generation, encryption or the backend write fails.
pub fn set(lockbox: &Lockbox, category: &str, value: Option<String>) -> Result<()> {
    let (value, generated) = match value {
        Some(value) => (value, false),
        None => (lockbox.generate_password()?, true),
    };

    lockbox.storage()?.save(category, &value)?;

    if generated {
        println!("🔐 Stored generated password for '{category}': {value}");
    } else {
        println!("🔐 Stored password for '{category}'");
    }
    Ok(())
}

/// # Errors
/// Returns an error if the category is missing or cannot be decrypted.
pub fn get(lockbox: &Lockbox, category: &str) -> Result<()> {
    let Some(value) = lockbox.storage()?.load(category)? else {
        bail!("No password stored for '{category}'");
    };

    println!("{value}");
    Ok(())
}

/// # Errors
/// Returns an error for an unknown generator or a length below the minimum.
pub fn generate(lockbox: &Lockbox, length: Option<u32>, kind: Option<&str>) -> Result<()> {
    let kind = kind.map_or(Ok(lockbox.settings().password.generator), parse_kind)?;
    let length = length.unwrap_or_else(|| lockbox.config().password_length());

    println!("{}", generate_password(kind, length)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lockbox(dir: &std::path::Path) -> Lockbox {
        let mut settings = Settings::default();
        settings.encryption.key = "shell-test-key".to_owned();
        settings.storage.path = dir.join("passwords.properties");
        Lockbox::from_settings(settings).unwrap()
    }

    #[test]
    fn set_without_value_stores_a_generated_password() {
        let dir = tempfile::tempdir().unwrap();
        set(&lockbox(dir.path()), "email", None).unwrap();

        let stored = lockbox(dir.path()).storage().unwrap().load("email").unwrap().unwrap();
        assert_eq!(stored.len(), 11);
    }

    #[test]
    fn get_of_unknown_category_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = get(&lockbox(dir.path()), "nowhere").unwrap_err();
        assert!(err.to_string().contains("nowhere"));
    }

    #[test]
    fn generate_rejects_short_lengths_and_unknown_kinds() {
        let dir = tempfile::tempdir().unwrap();
        let lockbox = lockbox(dir.path());

        assert!(generate(&lockbox, Some(4), None).is_err());
        assert!(generate(&lockbox, None, Some("emoji")).is_err());
        generate(&lockbox, Some(16), Some("SPECIAL")).unwrap();
    }
}
