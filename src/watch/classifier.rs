use std::path::PathBuf;

use rustc_hash::FxHashMap;

use super::types::{ChangeKind, DebouncedEvents};

/// Turns raw debounced changes into actionable events.
///
/// Pipeline: correct_by_existence → filter_actionable
pub(super) struct EventClassifier;

impl EventClassifier {
    pub(super) fn classify(raw: FxHashMap<PathBuf, ChangeKind>) -> Option<DebouncedEvents> {
        let mut changes = raw;

        Self::correct_by_existence(&mut changes);
        Self::filter_actionable(&mut changes);

        if changes.is_empty() {
            return None;
        }
        Some(DebouncedEvents(changes.into_iter().collect()))
    }

    /// Reconcile event kinds with actual filesystem state.
    ///
    /// The watcher may report stale events (e.g., Created for a file that's already
    /// been deleted, or Removed for a file that still exists after an atomic save).
    /// Rename halves become Created or Removed depending on which side survives.
    fn correct_by_existence(changes: &mut FxHashMap<PathBuf, ChangeKind>) {
        let paths: Vec<_> = changes.keys().cloned().collect();
        for path in paths {
            let kind = changes[&path];
            let exists = path.exists();
            match kind {
                ChangeKind::Created if !exists => {
                    crate::debug!("watch"; "discard created (gone): {}", path.display());
                    changes.remove(&path);
                }
                ChangeKind::Modified if !exists => {
                    crate::debug!("watch"; "upgrade modified->removed: {}", path.display());
                    changes.insert(path, ChangeKind::Removed);
                }
                ChangeKind::Removed if exists => {
                    crate::debug!("watch"; "downgrade removed->modified: {}", path.display());
                    changes.insert(path, ChangeKind::Modified);
                }
                ChangeKind::Renamed => {
                    let resolved = if exists { ChangeKind::Created } else { ChangeKind::Removed };
                    changes.insert(path, resolved);
                }
                _ => {}
            }
        }
    }

    /// Filter to actionable events only.
    ///
    /// - Created: files, and directories (a tree may have been moved in)
    /// - Modified: files only (directory mtime changes carry no route info)
    /// - Removed: always (the scanner decides between file and directory)
    fn filter_actionable(changes: &mut FxHashMap<PathBuf, ChangeKind>) {
        changes.retain(|p, k| match k {
            ChangeKind::Created => p.is_file() || p.is_dir(),
            ChangeKind::Modified => p.is_file(),
            ChangeKind::Removed => true,
            ChangeKind::Renamed => false,
        });
    }
}
