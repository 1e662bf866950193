//! Path normalization utilities.

use std::path::{Path, PathBuf};

/// Normalize a file system path to absolute form.
///
/// Tries `canonicalize()` first (resolves symlinks, `.`, `..`).
/// Falls back to:
/// - Return as-is if already absolute
/// - Join with current directory if relative
///
/// Deleted files cannot be canonicalized, so watcher paths for removals
/// go through the fallback; callers compare them against a canonical root.
#[inline]
pub fn normalize_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
        }
    })
}

/// Canonicalize the parent directory and re-attach the file name.
///
/// Works for paths whose file no longer exists, as long as the parent does.
pub fn normalize_parent(path: &Path) -> PathBuf {
    match (path.parent(), path.file_name()) {
        (Some(parent), Some(name)) if !parent.as_os_str().is_empty() => {
            normalize_path(parent).join(name)
        }
        _ => normalize_path(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path_absolute() {
        let path = Path::new("/absolute/path/file.txt");
        let normalized = normalize_path(path);
        assert!(normalized.is_absolute());
    }

    #[test]
    fn test_normalize_path_relative() {
        let path = Path::new("relative/path/file.txt");
        let normalized = normalize_path(path);
        assert!(normalized.is_absolute());
    }

    #[test]
    fn test_normalize_parent_of_deleted_file() {
        let temp = tempfile::TempDir::new().unwrap();
        let root = normalize_path(temp.path());
        let gone = temp.path().join("gone.ts");

        assert_eq!(normalize_parent(&gone), root.join("gone.ts"));
    }
}
