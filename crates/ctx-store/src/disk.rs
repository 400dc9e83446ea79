//! File-level helpers for the on-disk tier.
//!
//! Files live directly under the base directory as `<name>.<ext>`. Writes are
//! whole-file overwrites, not rename-based, so a crash mid-write can leave a
//! truncated file behind.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use ctx_types::Format;
use tracing::warn;

/// Path of the file holding `name` in `format`.
pub fn file_path(base_dir: &Path, name: &str, format: Format) -> PathBuf {
    base_dir.join(format!("{name}.{}", format.extension()))
}

/// Remove `path` if it exists. Returns `true` if a file was removed.
pub fn remove_if_exists(path: &Path) -> io::Result<bool> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}

/// Remove every regular file directly under `dir`. Subdirectories are skipped.
/// Returns the number of files removed.
pub fn remove_all_files(dir: &Path) -> io::Result<usize> {
    let mut removed = 0;
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type()?.is_dir() {
            warn!(path = %path.display(), "skipping directory in store base dir");
            continue;
        }
        if remove_if_exists(&path)? {
            removed += 1;
        }
    }
    Ok(removed)
}

/// List `(name, format)` for every file under `dir` with a known extension,
/// sorted by name, then format.
pub fn scan(dir: &Path) -> io::Result<Vec<(String, Format)>> {
    let mut found = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let path = entry.path();
        let (Some(stem), Some(ext)) = (
            path.file_stem().and_then(|s| s.to_str()),
            path.extension().and_then(|s| s.to_str()),
        ) else {
            continue;
        };
        if let Some(format) = Format::from_extension(ext) {
            found.push((stem.to_string(), format));
        }
    }
    found.sort();
    Ok(found)
}
