//! Backup feature slice.
//!
//! [`BackupService`] keeps an append-only, in-memory archive of [`AppState`] captures and
//! restores one of them across every piece of state it covers:
//!
//! 1. the access log is replaced,
//! 2. the runtime config is overwritten,
//! 3. the crypto facade is re-keyed (new epoch),
//! 4. the latest modification of every category is replayed into the backend.
//!
//! Everything that can be checked is checked before step 1, so a rejected restore
//! changes nothing. Snapshot and restore are not serialized against ordinary
//! save/load traffic; callers must quiesce that themselves.
//!
//! [`AppState`]: lockbox_audit::AppState
mod error;
mod service;

pub use crate::error::{BackupError, BackupErrorExt};
pub use crate::service::{BackupService, RestoreReport};
