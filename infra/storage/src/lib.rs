//! Durable key/ciphertext backends.
//!
//! The [`Backend`] trait is the whole contract: `write` a ciphertext under a category
//! name and `read` it back. Values are opaque strings; encryption happens upstream.
//!
//! * [`FileBackend`] keeps one properties-style text file, rewritten atomically on every write.
//! * [`MemoryBackend`] keeps a map in process memory and can simulate write failures.
//!
//! ```rust
//! use lockbox_storage::{Backend, FileBackend, StorageError};
//!
//! fn main() -> Result<(), StorageError> {
//!     # let tmp = tempfile::tempdir().unwrap();
//!     let backend = FileBackend::builder()
//!         .path(tmp.path().join("passwords.properties"))
//!         .create(true)
//!         .open()?;
//!
//!     backend.write("email", "c2VhbGVk")?;
//!     assert_eq!(backend.read("email")?.as_deref(), Some("c2VhbGVk"));
//!     assert_eq!(backend.read("bank")?, None);
//!     Ok(())
//! }
//! ```

mod backend;
mod builder;
mod engine;
mod error;
mod maintenance;
mod memory;
mod properties;

pub use backend::Backend;
pub use builder::FileBackendBuilder;
pub use engine::FileBackend;
pub use error::{StorageError, StorageErrorExt};
pub use memory::MemoryBackend;
