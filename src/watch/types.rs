use std::path::PathBuf;

use crate::scan::{FsEvent, FsEventKind};

/// What happened to a path, as reported by the OS watcher
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum ChangeKind {
    Created,
    Modified,
    Removed,
    /// One side of a rename; resolved against the filesystem later
    Renamed,
}

impl ChangeKind {
    pub(super) fn label(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Modified => "modified",
            Self::Removed => "removed",
            Self::Renamed => "renamed",
        }
    }
}

/// Debounced, existence-corrected changes ready to become `FsEvent`s
pub(super) struct DebouncedEvents(pub(super) Vec<(PathBuf, ChangeKind)>);

impl DebouncedEvents {
    /// Removals first so a rename frees its old path before the new one is
    /// added, then the rest; each group sorted by path.
    pub(super) fn into_fs_events(self) -> Vec<FsEvent> {
        let (mut removed, mut rest): (Vec<_>, Vec<_>) = self
            .0
            .into_iter()
            .partition(|(_, kind)| *kind == ChangeKind::Removed);
        removed.sort_by(|a, b| a.0.cmp(&b.0));
        rest.sort_by(|a, b| a.0.cmp(&b.0));

        removed
            .into_iter()
            .chain(rest)
            .map(|(path, kind)| {
                let kind = match kind {
                    ChangeKind::Removed => FsEventKind::Remove,
                    ChangeKind::Modified => FsEventKind::Update,
                    ChangeKind::Created | ChangeKind::Renamed => FsEventKind::Add,
                };
                FsEvent::new(kind, path)
            })
            .collect()
    }
}
