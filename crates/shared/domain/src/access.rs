use crate::constants::{CONSULTATION, MODIFICATION};
use serde::{Deserialize, Serialize};
use std::fmt;

/// What happened to a secret when it was recorded in the access log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessAction {
    /// The secret was written.
    Modification,
    /// The secret was read.
    Consultation,
}

impl AccessAction {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Modification => MODIFICATION,
            Self::Consultation => CONSULTATION,
        }
    }
}

impl fmt::Display for AccessAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A plaintext secret held in memory.
///
/// `Debug` is redacted so that access records can be traced without leaking values.
/// Use [`SecretValue::expose`] when the plaintext is actually needed.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SecretValue(String);

impl SecretValue {
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Debug for SecretValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretValue(***)")
    }
}

impl From<String> for SecretValue {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for SecretValue {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

/// One entry of a category's access history.
///
/// Records carry no timestamp: their position in the history encodes the order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessRecord {
    pub value: SecretValue,
    pub action: AccessAction,
}

impl AccessRecord {
    #[must_use]
    pub fn new(value: impl Into<SecretValue>, action: AccessAction) -> Self {
        Self { value: value.into(), action }
    }

    #[must_use]
    pub fn modification(value: impl Into<SecretValue>) -> Self {
        Self::new(value, AccessAction::Modification)
    }

    #[must_use]
    pub fn consultation(value: impl Into<SecretValue>) -> Self {
        Self::new(value, AccessAction::Consultation)
    }

    #[must_use]
    pub fn is_modification(&self) -> bool {
        self.action == AccessAction::Modification
    }
}
