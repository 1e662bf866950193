use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use rustc_hash::FxHashMap;

use super::types::ChangeKind;

/// Pure debouncer: only handles timing and event deduplication.
/// No filesystem access, no route knowledge.
pub(super) struct Debouncer {
    /// Path → ChangeKind (dedup is free via HashMap key uniqueness)
    pub(super) changes: FxHashMap<PathBuf, ChangeKind>,
    pub(super) last_event: Option<Instant>,
    window: Duration,
}

impl Debouncer {
    pub(super) fn new(window: Duration) -> Self {
        Self {
            changes: FxHashMap::default(),
            last_event: None,
            window,
        }
    }

    /// Add a notify event, applying dedup rules:
    /// - Remove + Create/Modify → Create/Modify (file was restored)
    /// - Modify + Remove → Remove (file was deleted)
    /// - Create + Remove → dropped (appeared then vanished)
    /// - Rename always wins, its outcome is decided by existence later
    /// - otherwise first event wins
    pub(super) fn add_event(&mut self, event: &notify::Event) {
        use notify::EventKind;
        use notify::event::ModifyKind;

        let kind = match event.kind {
            EventKind::Create(_) => ChangeKind::Created,
            EventKind::Remove(_) => ChangeKind::Removed,
            // mtime/chmod noise never changes a route
            EventKind::Modify(ModifyKind::Metadata(_)) => return,
            EventKind::Modify(ModifyKind::Name(_)) => ChangeKind::Renamed,
            EventKind::Modify(_) => ChangeKind::Modified,
            _ => return,
        };

        crate::debug!("watch"; "raw notify: {:?} {:?}", event.kind, event.paths);

        for path in &event.paths {
            if is_temp_file(path) {
                continue;
            }
            self.record(path.clone(), kind);
        }
    }

    fn record(&mut self, path: PathBuf, kind: ChangeKind) {
        if let Some(&existing) = self.changes.get(&path) {
            match (existing, kind) {
                (ChangeKind::Removed, ChangeKind::Created | ChangeKind::Modified) => {
                    crate::debug!("watch"; "restore {}->{}: {}", existing.label(), kind.label(), path.display());
                    self.changes.insert(path, kind);
                }
                (ChangeKind::Modified, ChangeKind::Removed) => {
                    crate::debug!("watch"; "upgrade modified->removed: {}", path.display());
                    self.changes.insert(path, ChangeKind::Removed);
                }
                (ChangeKind::Created, ChangeKind::Removed) => {
                    crate::debug!("watch"; "discard created+removed: {}", path.display());
                    self.changes.remove(&path);
                }
                (_, ChangeKind::Renamed) => {
                    self.changes.insert(path, ChangeKind::Renamed);
                }
                _ => return,
            }
            self.last_event = Some(Instant::now());
            return;
        }

        crate::debug!("watch"; "event {}: {}", kind.label(), path.display());
        self.changes.insert(path, kind);
        self.last_event = Some(Instant::now());
    }

    /// Take raw changes once the debounce window has passed.
    pub(super) fn take_if_ready(&mut self) -> Option<FxHashMap<PathBuf, ChangeKind>> {
        if !self.is_ready() {
            return None;
        }

        let changes = std::mem::take(&mut self.changes);
        self.last_event = None;

        if changes.is_empty() {
            return None;
        }
        Some(changes)
    }

    pub(super) fn is_ready(&self) -> bool {
        let Some(last_event) = self.last_event else {
            return false;
        };

        last_event.elapsed() >= self.window && !self.changes.is_empty()
    }

    /// Precise sleep duration until next possible ready time.
    pub(super) fn sleep_duration(&self) -> Duration {
        let Some(last_event) = self.last_event else {
            return Duration::from_secs(86400);
        };

        self.window
            .saturating_sub(last_event.elapsed())
            .max(Duration::from_millis(1))
    }
}

/// Check if path is a temp/backup file (editor artifacts).
pub(super) fn is_temp_file(path: &Path) -> bool {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    matches!(ext, "bck" | "bak" | "backup" | "swp" | "swo" | "tmp")
        || name.ends_with('~')
        || name.starts_with('.')
}
