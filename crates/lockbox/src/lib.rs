//! Facade crate for Lockbox.
//! Re-exports the slices and provides [`Lockbox`], the explicitly owned context that wires
//! them together. Keep this crate thin: it composes other crates, it does not implement
//! business logic.
//!
//! ## Usage
//! ```rust
//! use lockbox::prelude::*;
//! use std::sync::Arc;
//!
//! # fn main() -> Result<(), LockboxError> {
//! let mut settings = Settings::default();
//! settings.encryption.key = "correct horse battery staple".to_owned();
//!
//! let lockbox = Lockbox::builder()
//!     .settings(settings)
//!     .backend(Arc::new(MemoryBackend::new()))
//!     .build()?;
//!
//! lockbox.storage()?.save("email", "hunter2-hunter2")?;
//! let index = lockbox.backup()?.take_snapshot();
//! lockbox.storage()?.save("email", "changed")?;
//! lockbox.backup()?.restore_snapshot(index)?;
//!
//! assert_eq!(lockbox.storage()?.load("email")?.as_deref(), Some("hunter2-hunter2"));
//! # Ok(())
//! # }
//! ```
mod context;
mod error;

pub use crate::context::{Lockbox, LockboxBuilder};
pub use crate::error::{LockboxError, LockboxErrorExt};

pub use lockbox_domain as domain;
pub use lockbox_kernel as kernel;

/// Feature slices and infrastructure, re-exported under one roof.
pub mod features {
    pub use lockbox_audit as audit;
    pub use lockbox_backup as backup;
    pub use lockbox_passgen as passgen;
    pub use lockbox_secrets as secrets;
}

pub mod infra {
    pub use lockbox_crypto as crypto;
    pub use lockbox_storage as storage;
}

pub mod prelude {
    pub use crate::context::Lockbox;
    pub use crate::error::{LockboxError, LockboxErrorExt};
    pub use lockbox_backup::RestoreReport;
    pub use lockbox_domain::config::{ConfigSnapshot, GeneratorKind, Settings};
    pub use lockbox_passgen::PasswordGenerator;
    pub use lockbox_secrets::{Category, PasswordManager};
    pub use lockbox_storage::{Backend, FileBackend, MemoryBackend};
}
