use crate::engine::{FileBackend, FileBackendInner};
use crate::error::{StorageError, StorageErrorExt};
use crate::maintenance;
use parking_lot::Mutex;
use private::Sealed;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::AtomicU64;
use tracing::info;

#[derive(Debug, Default)]
pub struct NoPath;
#[derive(Debug)]
pub struct WithPath(PathBuf);

mod private {
    pub(super) trait Sealed {}
}
impl Sealed for NoPath {}
impl Sealed for WithPath {}

#[allow(private_bounds)]
#[derive(Debug)]
pub struct FileBackendBuilder<S: Sealed = NoPath> {
    state: S,
    create: bool,
}

impl Default for FileBackendBuilder<NoPath> {
    fn default() -> Self {
        Self { state: NoPath, create: true }
    }
}

#[allow(private_bounds)]
impl<S: Sealed> FileBackendBuilder<S> {
    #[must_use = "Sets whether missing parent directories are created on open"]
    pub const fn create(mut self, enable: bool) -> Self {
        self.create = enable;
        self
    }
}

impl FileBackendBuilder<NoPath> {
    #[must_use = "Creates a new file backend builder"]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use = "Sets the properties file the backend reads and rewrites"]
    pub fn path(self, path: impl Into<PathBuf>) -> FileBackendBuilder<WithPath> {
        FileBackendBuilder { state: WithPath(path.into()), create: self.create }
    }
}

impl FileBackendBuilder<WithPath> {
    /// Opens the backend.
    ///
    /// 1. Creates the parent directory if `create(true)` was set.
    /// 2. Removes stale temp files left in that directory by interrupted writes.
    ///
    /// The properties file itself is not created until the first write; a missing file
    /// reads as empty.
    ///
    /// # Errors
    /// Returns [`StorageError::Io`] if the parent directory is missing and `create` is
    /// false, or it cannot be created.
    pub fn open(self) -> Result<FileBackend, StorageError> {
        let path = self.state.0;
        let parent = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };

        if self.create {
            fs::create_dir_all(&parent)
                .context(format!("Failed to create storage directory: {}", parent.display()))?;
        } else if !parent.is_dir() {
            return Err(StorageError::Io {
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
                context: Some(format!("Storage directory missing: {}", parent.display()).into()),
            });
        }

        maintenance::purge_tmp(&path);
        info!(path = %path.display(), "Opened file backend");

        Ok(FileBackend {
            inner: Arc::new(FileBackendInner {
                path,
                tmp_counter: AtomicU64::new(1),
                write_lock: Mutex::new(()),
            }),
        })
    }
}
