//! Directory enumeration for one-shot builds and moved-in trees.

use std::path::{Path, PathBuf};

use jwalk::WalkDir;

use super::ScanError;

/// All files below `dir`, sorted, hidden entries skipped.
///
/// Unreadable entries are returned as errors alongside the files found, so
/// one bad directory never hides the rest of the tree.
pub fn walk_files(dir: &Path) -> (Vec<PathBuf>, Vec<ScanError>) {
    let mut files = Vec::new();
    let mut errors = Vec::new();

    if !dir.is_dir() {
        return (files, errors);
    }

    for entry in WalkDir::new(dir).skip_hidden(true).sort(true) {
        match entry {
            Ok(entry) if entry.file_type().is_file() => files.push(entry.path()),
            Ok(_) => {}
            Err(err) => errors.push(ScanError::Walk {
                path: err.path().map_or_else(|| dir.to_path_buf(), Path::to_path_buf),
                message: err.to_string(),
            }),
        }
    }

    files.sort();
    (files, errors)
}
