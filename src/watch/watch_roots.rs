use std::path::PathBuf;

use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use rustc_hash::FxHashSet;

/// Roots that appeared or vanished since the last check.
#[derive(Debug, Default)]
pub(super) struct RootChanges {
    pub(super) attached: Vec<PathBuf>,
    pub(super) lost: Vec<PathBuf>,
}

/// Watch-root consistency manager.
///
/// - attach existing roots at startup
/// - re-attach roots that were removed and recreated (or created late)
pub(super) struct WatchRoots {
    desired: Vec<PathBuf>,
    attached: FxHashSet<PathBuf>,
}

impl WatchRoots {
    pub(super) fn new(paths: Vec<PathBuf>) -> Self {
        Self {
            desired: paths,
            attached: FxHashSet::default(),
        }
    }

    pub(super) fn attach_existing(&mut self, watcher: &mut RecommendedWatcher) -> notify::Result<()> {
        for path in &self.desired {
            if !path.is_dir() {
                crate::debug!("watch"; "not watching yet (missing): {}", path.display());
                continue;
            }
            watcher.watch(path, RecursiveMode::Recursive)?;
            self.attached.insert(path.clone());
        }

        Ok(())
    }

    /// Drop handles of vanished roots and attach roots that exist again.
    ///
    /// Files created inside a root before it was attached were never
    /// observed, so callers rescan every newly attached root.
    pub(super) fn maintain(&mut self, watcher: &mut RecommendedWatcher) -> RootChanges {
        let mut changes = RootChanges::default();

        self.attached.retain(|path| {
            let alive = path.is_dir();
            if !alive {
                let _ = watcher.unwatch(path);
                crate::debug!("watch"; "watch root gone: {}", path.display());
                changes.lost.push(path.clone());
            }
            alive
        });

        for path in &self.desired {
            if self.attached.contains(path) || !path.is_dir() {
                continue;
            }

            match watcher.watch(path, RecursiveMode::Recursive) {
                Ok(()) => {
                    self.attached.insert(path.clone());
                    crate::debug!("watch"; "attached watch: {}", path.display());
                    changes.attached.push(path.clone());
                }
                Err(e) => crate::debug!("watch"; "cannot watch {}: {}", path.display(), e),
            }
        }

        changes
    }

    pub(super) fn all_attached(&self) -> bool {
        self.attached.len() == self.desired.len()
    }
}
