//! Properties-file backend with atomic whole-file rewrites.

use crate::backend::Backend;
use crate::builder::FileBackendBuilder;
use crate::error::{StorageError, StorageErrorExt};
use crate::maintenance::TMP_MARKER;
use crate::properties;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

#[derive(Debug)]
pub(crate) struct FileBackendInner {
    pub(crate) path: PathBuf,
    pub(crate) tmp_counter: AtomicU64,
    /// Serializes read-modify-write cycles within this process.
    pub(crate) write_lock: Mutex<()>,
}

/// A [`Backend`] storing every category in a single properties file.
///
/// Each write loads the file, replaces one entry and swaps in a fully rewritten copy:
/// 1. The new content is written to a sibling temp file (`<name>.lbxtmp.<n>`).
/// 2. The temp file is synced to disk.
/// 3. It is renamed over the target.
///
/// Readers therefore see either the old or the new file, never a partial one.
/// The handle is cheap to clone.
#[derive(Debug, Clone)]
pub struct FileBackend {
    pub(crate) inner: Arc<FileBackendInner>,
}

impl FileBackend {
    #[must_use = "The backend is not opened until you call .open()"]
    pub fn builder() -> FileBackendBuilder {
        FileBackendBuilder::new()
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.inner.path
    }

    /// Every stored entry, ordered by category name.
    ///
    /// # Errors
    /// Returns [`StorageError::Io`] or [`StorageError::Format`] if the file cannot be loaded.
    pub fn entries(&self) -> Result<BTreeMap<String, String>, StorageError> {
        self.load()
    }

    fn load(&self) -> Result<BTreeMap<String, String>, StorageError> {
        let path = &self.inner.path;
        match fs::read_to_string(path) {
            Ok(text) => properties::parse(&text).context(format!("Parsing {}", path.display())),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(err) => Err(StorageError::Io {
                source: err,
                context: Some(format!("Read failed: {}", path.display()).into()),
            }),
        }
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let target = &self.inner.path;
        let temp = unique_tmp_path(target, &self.inner.tmp_counter);
        let body = properties::render(entries);

        {
            let mut file = fs::OpenOptions::new()
                .create_new(true)
                .write(true)
                .open(&temp)
                .context(format!("Temp creation failed: {}", temp.display()))?;
            file.write_all(body.as_bytes()).context("Write failed")?;
            file.sync_all().context("Hardware sync failed")?;
        }

        if let Err(err) = fs::rename(&temp, target) {
            let _ = fs::remove_file(&temp);
            return Err(StorageError::Io {
                source: err,
                context: Some(
                    format!("Atomic swap failed: {} -> {}", temp.display(), target.display()).into(),
                ),
            });
        }

        if let Some(parent) = target.parent() {
            sync_dir(parent);
        }
        Ok(())
    }
}

impl Backend for FileBackend {
    fn write(&self, category: &str, ciphertext: &str) -> Result<(), StorageError> {
        let _guard = self.inner.write_lock.lock();

        let mut entries = self.load()?;
        entries.insert(category.to_owned(), ciphertext.to_owned());
        self.persist(&entries)?;

        debug!(category, path = %self.inner.path.display(), "Ciphertext written");
        Ok(())
    }

    fn read(&self, category: &str) -> Result<Option<String>, StorageError> {
        Ok(self.load()?.remove(category))
    }

    fn load_all(&self) -> Result<BTreeMap<String, String>, StorageError> {
        self.load()
    }

    /// One load and one atomic rewrite for the whole batch.
    fn write_all(&self, batch: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let _guard = self.inner.write_lock.lock();

        let mut entries = self.load()?;
        entries.extend(batch.iter().map(|(k, v)| (k.clone(), v.clone())));
        self.persist(&entries)?;

        debug!(count = batch.len(), path = %self.inner.path.display(), "Ciphertext batch written");
        Ok(())
    }
}

fn unique_tmp_path(target: &Path, counter: &AtomicU64) -> PathBuf {
    let n = counter.fetch_add(1, Ordering::Relaxed);
    let name = target.file_name().map_or_else(
        || format!("lockbox{TMP_MARKER}{n}"),
        |f| format!("{}{TMP_MARKER}{n}", f.to_string_lossy()),
    );
    target.with_file_name(name)
}

#[cfg(unix)]
fn sync_dir(path: &Path) {
    let dir = if path.as_os_str().is_empty() { Path::new(".") } else { path };
    if let Ok(handle) = fs::File::open(dir) {
        let _ = handle.sync_all();
    }
}

#[cfg(not(unix))]
const fn sync_dir(_path: &Path) {}
