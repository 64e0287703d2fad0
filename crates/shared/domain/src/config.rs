use crate::constants::{DEFAULT_POOL_CAPACITY, DEFAULT_STORAGE_PATH, MIN_PASSWORD_LENGTH};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Top-level settings loaded from the config file and `LOCKBOX__*` environment.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub database: DatabaseSettings,
    pub encryption: EncryptionSettings,
    pub password: PasswordSettings,
    pub storage: StorageSettings,
    pub logging: LoggingSettings,
}

/// Connection string of the (external) database. Stored and restored, never dialed.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    pub url: String,
}

#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct EncryptionSettings {
    pub key: String,
    pub pool_capacity: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PasswordSettings {
    pub length: u32,
    pub generator: GeneratorKind,
}

/// Location of the properties file used by the file backend.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    pub path: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
    pub directory: Option<PathBuf>,
    pub json: bool,
    pub console: bool,
}

/// Which password generator strategy to use.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeneratorKind {
    #[default]
    Alphanumeric,
    Special,
}

impl GeneratorKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Alphanumeric => "alphanumeric",
            Self::Special => "special",
        }
    }
}

impl fmt::Display for GeneratorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a generator name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownGeneratorKind(pub String);

impl fmt::Display for UnknownGeneratorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown password generator: '{}'", self.0)
    }
}

impl std::error::Error for UnknownGeneratorKind {}

impl FromStr for GeneratorKind {
    type Err = UnknownGeneratorKind;

    /// Case-insensitive; surrounding whitespace is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "alphanumeric" => Ok(Self::Alphanumeric),
            "special" => Ok(Self::Special),
            _ => Err(UnknownGeneratorKind(s.to_owned())),
        }
    }
}

/// The mutable runtime configuration captured into every snapshot.
///
/// Holds the encryption passphrase in clear, so `Debug` redacts it.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigSnapshot {
    pub database_url: String,
    pub encryption_key: String,
    pub password_length: u32,
}

impl fmt::Debug for ConfigSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigSnapshot")
            .field("database_url", &self.database_url)
            .field("encryption_key", &"***")
            .field("password_length", &self.password_length)
            .finish()
    }
}

impl From<&Settings> for ConfigSnapshot {
    fn from(settings: &Settings) -> Self {
        Self {
            database_url: settings.database.url.clone(),
            encryption_key: settings.encryption.key.clone(),
            password_length: settings.password.length,
        }
    }
}

impl fmt::Debug for EncryptionSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncryptionSettings")
            .field("key", &"***")
            .field("pool_capacity", &self.pool_capacity)
            .finish()
    }
}

// --- Default ---

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self { url: "jdbc:mysql://localhost:3306/lockbox".to_owned() }
    }
}

impl Default for EncryptionSettings {
    fn default() -> Self {
        Self { key: String::new(), pool_capacity: DEFAULT_POOL_CAPACITY }
    }
}

impl Default for PasswordSettings {
    fn default() -> Self {
        Self { length: MIN_PASSWORD_LENGTH, generator: GeneratorKind::default() }
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self { path: PathBuf::from(DEFAULT_STORAGE_PATH) }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self { level: "info".to_owned(), directory: None, json: false, console: true }
    }
}
