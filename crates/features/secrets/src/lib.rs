//! Secrets feature slice.
//!
//! [`StorageManager`] is the only component that touches both the crypto facade and the
//! durable backend. Every successful save or load is mirrored into the [`AccessLog`]:
//!
//! ```text
//! save: encrypt -> backend.write -> log(modification)
//! load: backend.read -> decrypt -> log(consultation)
//! ```
//!
//! On top of it sit the [`PasswordManager`] chain (basic, verifying, alerting) and the
//! [`Category`] tree.
//!
//! [`AccessLog`]: lockbox_audit::AccessLog
mod category;
mod error;
mod manager;
mod password;

pub use crate::category::{Category, CategoryKind};
pub use crate::error::{SecretsError, SecretsErrorExt};
pub use crate::manager::{ReplayOutcome, StorageManager};
pub use crate::password::{
    AlertingPasswordManager, BasicPasswordManager, PasswordManager, VerifyingPasswordManager,
};
