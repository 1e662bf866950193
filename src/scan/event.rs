//! Scanner input events, change summaries and errors.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::route::RouteEntry;

/// What happened to a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FsEventKind {
    Add,
    Update,
    Remove,
}

impl FsEventKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Update => "update",
            Self::Remove => "remove",
        }
    }
}

impl fmt::Display for FsEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A file change under the project root.
///
/// `path` may be absolute (it must then lie under the root) or relative to
/// the root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FsEvent {
    pub kind: FsEventKind,
    pub path: PathBuf,
}

impl FsEvent {
    pub fn new(kind: FsEventKind, path: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            path: path.into(),
        }
    }

    pub fn add(path: impl Into<PathBuf>) -> Self {
        Self::new(FsEventKind::Add, path)
    }

    pub fn update(path: impl Into<PathBuf>) -> Self {
        Self::new(FsEventKind::Update, path)
    }

    pub fn remove(path: impl Into<PathBuf>) -> Self {
        Self::new(FsEventKind::Remove, path)
    }
}

/// Why an event was skipped.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScanError {
    #[error("`{0}` is outside the project root")]
    OutsideRoot(PathBuf),

    #[error("`{0}` escapes its directory with `..`")]
    ParentTraversal(PathBuf),

    #[error("`{0}` is not valid UTF-8")]
    NonUtf8(PathBuf),

    #[error("event names the project root itself")]
    EmptyPath,

    #[error("cannot read `{path}`: {message}")]
    Walk { path: PathBuf, message: String },
}

/// Net effect of one or more applied events on the route set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteChange {
    pub added: Vec<RouteEntry>,
    /// Entries replaced with a different value (current value).
    pub updated: Vec<RouteEntry>,
    pub removed: Vec<RouteEntry>,
}

impl RouteChange {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.updated.is_empty() && self.removed.is_empty()
    }

    pub fn merge(&mut self, other: RouteChange) {
        self.added.extend(other.added);
        self.updated.extend(other.updated);
        self.removed.extend(other.removed);
    }

    /// Short `+added ~updated -removed` summary for status lines.
    pub fn summary(&self) -> String {
        format!(
            "+{} ~{} -{}",
            self.added.len(),
            self.updated.len(),
            self.removed.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route::{RouteKind, Verb};

    #[test]
    fn test_event_constructors() {
        assert_eq!(FsEvent::add("a").kind, FsEventKind::Add);
        assert_eq!(FsEvent::update("a").kind, FsEventKind::Update);
        assert_eq!(FsEvent::remove("a").kind, FsEventKind::Remove);
        assert_eq!(FsEventKind::Remove.to_string(), "remove");
    }

    #[test]
    fn test_change_merge_and_summary() {
        let entry = RouteEntry::new("app/pages/a.ts", "/a", RouteKind::Page, Verb::Get);
        let mut change = RouteChange::default();
        assert!(change.is_empty());

        change.merge(RouteChange {
            added: vec![entry.clone()],
            ..Default::default()
        });
        change.merge(RouteChange {
            removed: vec![entry],
            ..Default::default()
        });

        assert!(!change.is_empty());
        assert_eq!(change.summary(), "+1 ~0 -1");
    }

    #[test]
    fn test_scan_error_display() {
        let err = ScanError::OutsideRoot(PathBuf::from("/elsewhere/a.ts"));
        assert!(err.to_string().contains("/elsewhere/a.ts"));
        assert!(ScanError::EmptyPath.to_string().contains("root"));
    }
}
