//! File I/O helpers for configuration files

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use fs2::FileExt;

use crate::{Error, Result};

/// Replace `path` with `content` without ever exposing a partial file.
///
/// The content goes to a sibling temp file, held under an exclusive lock
/// while it is written and synced, which is then renamed over `path`. On
/// failure the temp file is removed and `path` is left untouched.
pub fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy())
        .unwrap_or_default();
    // Sibling of the target so the rename stays on one filesystem
    let temp_path = path.with_file_name(format!(".{file_name}.{}.tmp", std::process::id()));

    let result = write_locked(&temp_path, path, content)
        .and_then(|()| fs::rename(&temp_path, path).map_err(|e| Error::io(path, e)));
    if result.is_err() && temp_path.exists() {
        tracing::debug!(path = ?temp_path, "Removing temporary file after failed write");
        let _ = fs::remove_file(&temp_path);
    }
    result
}

fn write_locked(temp_path: &Path, target: &Path, content: &[u8]) -> Result<()> {
    let lock_failed = |_| Error::LockFailed {
        path: target.to_path_buf(),
    };

    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(temp_path)
        .map_err(|e| Error::io(temp_path, e))?;

    file.lock_exclusive().map_err(lock_failed)?;
    file.write_all(content)
        .and_then(|()| file.sync_all())
        .map_err(|e| Error::io(temp_path, e))?;
    file.unlock().map_err(lock_failed)
}

/// Read a text file, or `None` if it does not exist.
pub fn read_optional(path: &Path) -> Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(Error::io(path, e)),
    }
}

/// Create a directory and its parents if missing.
pub fn ensure_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path).map_err(|e| Error::io(path, e))
}
