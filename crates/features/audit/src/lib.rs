//! Audit feature slice.
//!
//! [`AccessLog`] is the live, append-only history of every secret read and write.
//! [`AppState`] is a frozen copy of that history plus the runtime config, used as a
//! memento by the backup slice. Nothing here can fail.
mod log;
mod state;

pub use crate::log::AccessLog;
pub use crate::state::AppState;
