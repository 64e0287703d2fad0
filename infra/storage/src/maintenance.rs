use std::path::Path;
use std::time::{Duration, SystemTime};
use tracing::{info, warn};

/// Marker inserted between the target file name and the write counter.
pub(crate) const TMP_MARKER: &str = ".lbxtmp.";

const STALE_AFTER: Duration = Duration::from_secs(300);

/// Removes temp files older than five minutes that were left next to `target`.
/// Failures are logged and otherwise ignored.
pub(crate) fn purge_tmp(target: &Path) {
    let dir = target.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or_else(|| Path::new("."));
    let Some(file_name) = target.file_name().and_then(|n| n.to_str()) else {
        return;
    };
    let prefix = format!("{file_name}{TMP_MARKER}");

    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };

    let now = SystemTime::now();
    let (mut removed, mut failed) = (0usize, 0usize);

    for entry in entries.flatten() {
        let path = entry.path();
        let is_tmp = entry.file_name().to_str().is_some_and(|name| name.starts_with(&prefix));
        if !is_tmp || !path.is_file() || !is_stale(&path, now) {
            continue;
        }
        match std::fs::remove_file(&path) {
            Ok(()) => removed += 1,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to remove stale temp file");
                failed += 1;
            }
        }
    }

    if removed > 0 || failed > 0 {
        info!(removed, failed, "Cleaned up temporary files");
    }
}

fn is_stale(path: &Path, now: SystemTime) -> bool {
    std::fs::metadata(path)
        .ok()
        .and_then(|m| m.modified().ok())
        .and_then(|modified| now.duration_since(modified).ok())
        .is_none_or(|age| age > STALE_AFTER)
}
