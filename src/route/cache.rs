//! Incremental route storage keyed by source path.
//!
//! Writers serialize on a `RwLock`; readers get a memoized, sorted snapshot
//! through `ArcSwapOption`. The memo is dropped inside the same critical
//! section as the mutation, so a snapshot never reflects half of an update.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use arc_swap::ArcSwapOption;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use super::RouteEntry;

/// Result of an upsert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Upsert {
    /// No entry existed for the path.
    Inserted,
    /// An entry existed and was replaced; carries the previous value.
    Replaced(RouteEntry),
}

impl Upsert {
    /// True when the cache content actually changed.
    pub fn is_change(&self, current: &RouteEntry) -> bool {
        match self {
            Self::Inserted => true,
            Self::Replaced(previous) => previous != current,
        }
    }
}

/// Thread-safe route storage for one project root.
///
/// There is no global instance; construct one per root and share it with
/// `Arc`.
#[derive(Debug, Default)]
pub struct RouteCache {
    entries: RwLock<FxHashMap<PathBuf, RouteEntry>>,
    /// Sorted view, rebuilt lazily after a mutation.
    sorted: ArcSwapOption<Vec<RouteEntry>>,
    /// Bumped on every effective mutation.
    generation: AtomicU64,
}

impl RouteCache {
    /// Create an empty cache.
    pub fn create() -> Self {
        Self::default()
    }

    /// Insert or replace the entry for `path`.
    pub fn upsert(&self, path: impl Into<PathBuf>, entry: RouteEntry) -> Upsert {
        let path = path.into();
        let mut entries = self.entries.write();
        let outcome = match entries.insert(path, entry.clone()) {
            Some(previous) => Upsert::Replaced(previous),
            None => Upsert::Inserted,
        };
        if outcome.is_change(&entry) {
            self.invalidate();
        }
        outcome
    }

    /// Remove the entry for `path`. Absent paths are a no-op.
    pub fn remove(&self, path: &Path) -> Option<RouteEntry> {
        let mut entries = self.entries.write();
        let removed = entries.remove(path);
        if removed.is_some() {
            self.invalidate();
        }
        removed
    }

    /// Remove every entry whose path lies under `dir`.
    ///
    /// Returned entries are in snapshot order.
    pub fn remove_under(&self, dir: &Path) -> Vec<RouteEntry> {
        let mut entries = self.entries.write();
        let doomed: Vec<PathBuf> = entries
            .keys()
            .filter(|path| path.starts_with(dir) && path.as_path() != dir)
            .cloned()
            .collect();

        let mut removed: Vec<_> = doomed
            .iter()
            .filter_map(|path| entries.remove(path))
            .collect();

        if !removed.is_empty() {
            self.invalidate();
        }
        removed.sort_by(RouteEntry::snapshot_order);
        removed
    }

    /// Sorted view of all entries: api, page, rpc; then by path.
    pub fn snapshot(&self) -> Arc<Vec<RouteEntry>> {
        if let Some(sorted) = self.sorted.load_full() {
            return sorted;
        }

        // Hold the read lock while publishing so no writer can slip a
        // mutation between building and storing the memo.
        let entries = self.entries.read();
        let mut sorted: Vec<_> = entries.values().cloned().collect();
        sorted.sort_by(RouteEntry::snapshot_order);

        let sorted = Arc::new(sorted);
        self.sorted.store(Some(Arc::clone(&sorted)));
        sorted
    }

    pub fn get(&self, path: &Path) -> Option<RouteEntry> {
        self.entries.read().get(path).cloned()
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.entries.read().contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn clear(&self) {
        let mut entries = self.entries.write();
        if !entries.is_empty() {
            entries.clear();
            self.invalidate();
        }
    }

    /// Mutation counter, for cheap "did anything change" checks.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Must be called with the write lock held.
    fn invalidate(&self) {
        self.sorted.store(None);
        self.generation.fetch_add(1, Ordering::AcqRel);
    }
}
