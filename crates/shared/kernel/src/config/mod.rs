mod error;
mod live;

pub use error::{ConfigError, ConfigErrorExt};
pub use live::LiveConfig;

use config::{Config, Environment, File};
use lockbox_domain::config::{ConfigSnapshot, Settings};
use lockbox_domain::constants::{MAX_PASSWORD_LENGTH, MIN_PASSWORD_LENGTH};
use std::path::{Path, PathBuf};
use tracing::info;

/// Environment variable prefix for overrides (`LOCKBOX__ENCRYPTION__KEY` maps to `encryption.key`).
pub const ENV_PREFIX: &str = "LOCKBOX";

/// File used when no explicit path is given. The extension is resolved by the `config` crate.
pub const DEFAULT_SETTINGS_FILE: &str = "lockbox";

/// Loads [`Settings`] from a file layered with environment overrides.
///
/// 1. **Base File**: `path`, or `lockbox.{toml,json,yaml,...}` in the working directory.
/// 2. **Environment Overrides**: variables prefixed with `LOCKBOX__`, nested with `__`.
///
/// The result is not validated; call [`validate_settings`] before building a context from it.
///
/// # Errors
/// * The configuration file cannot be found or parsed.
/// * A value does not match the shape of [`Settings`].
pub fn load_settings(path: Option<impl AsRef<Path>>) -> Result<Settings, ConfigError> {
    let effective_path =
        path.map_or_else(|| PathBuf::from(DEFAULT_SETTINGS_FILE), |p| p.as_ref().to_path_buf());

    let builder = Config::builder()
        .add_source(File::from(effective_path.as_path()).required(true))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true)
                .convert_case(config::Case::Snake),
        );

    info!(path = %effective_path.display(), "Loading settings");

    let settings = builder
        .build()
        .context("Failed to build settings")?
        .try_deserialize::<Settings>()
        .context("Failed to deserialize settings")?;

    Ok(settings)
}

/// Checks the mutable runtime fields.
///
/// # Errors
/// Returns [`ConfigError::Validation`] when the password length is outside
/// `MIN_PASSWORD_LENGTH..=MAX_PASSWORD_LENGTH` or the encryption key is blank.
pub fn validate_snapshot(snapshot: &ConfigSnapshot) -> Result<(), ConfigError> {
    if snapshot.password_length < MIN_PASSWORD_LENGTH {
        return Err(ConfigError::validation(format!(
            "password length must be at least {MIN_PASSWORD_LENGTH}, got {}",
            snapshot.password_length
        )));
    }
    if snapshot.password_length > MAX_PASSWORD_LENGTH {
        return Err(ConfigError::validation(format!(
            "password length must be at most {MAX_PASSWORD_LENGTH}, got {}",
            snapshot.password_length
        )));
    }
    if snapshot.encryption_key.trim().is_empty() {
        return Err(ConfigError::validation("encryption key must not be blank"));
    }
    Ok(())
}

/// Validates the runtime fields plus settings that only matter at startup.
///
/// # Errors
/// Everything [`validate_snapshot`] rejects, plus a zero pool capacity.
pub fn validate_settings(settings: &Settings) -> Result<(), ConfigError> {
    validate_snapshot(&ConfigSnapshot::from(settings))?;
    if settings.encryption.pool_capacity == 0 {
        return Err(ConfigError::validation("cipher pool capacity must be at least 1"));
    }
    Ok(())
}
