//! Route entry types: kind, verb and the entry itself.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

/// Kind of route a source file resolves to.
///
/// Variant order is the snapshot precedence: api routes first, then pages,
/// then rpc endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteKind {
    /// Request handler under an `api/` directory
    Api,
    /// Page under a `pages/` directory
    Page,
    /// Query or mutation exposed at `/api/rpc/<name>`
    Rpc,
}

impl RouteKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::Api => "api",
            Self::Page => "page",
            Self::Rpc => "rpc",
        }
    }
}

impl fmt::Display for RouteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// HTTP verb accepted by a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Verb {
    #[serde(rename = "get")]
    Get,
    #[serde(rename = "post")]
    Post,
    #[serde(rename = "put")]
    Put,
    #[serde(rename = "delete")]
    Delete,
    #[serde(rename = "patch")]
    Patch,
    #[serde(rename = "head")]
    Head,
    #[serde(rename = "options")]
    Options,
    /// Any verb (api handlers dispatch on the method themselves)
    #[serde(rename = "*")]
    Any,
}

impl Verb {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::Post => "post",
            Self::Put => "put",
            Self::Delete => "delete",
            Self::Patch => "patch",
            Self::Head => "head",
            Self::Options => "options",
            Self::Any => "*",
        }
    }

    /// Whether two verbs can be served by the same request.
    pub fn overlaps(self, other: Verb) -> bool {
        self == other || self == Self::Any || other == Self::Any
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One classified source file.
///
/// Serializes as `{"path", "uri", "type", "verb"}`, the shape consumed by
/// manifest writers and the dev server route table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RouteEntry {
    /// Source path relative to the project root (native separators).
    pub path: PathBuf,
    /// URL path, always `/`-separated with a leading slash.
    pub uri: String,
    #[serde(rename = "type")]
    pub kind: RouteKind,
    pub verb: Verb,
}

impl RouteEntry {
    pub fn new(path: impl Into<PathBuf>, uri: impl Into<String>, kind: RouteKind, verb: Verb) -> Self {
        Self {
            path: path.into(),
            uri: uri.into(),
            kind,
            verb,
        }
    }

    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Ordering used by cache snapshots: kind precedence, then source path.
    pub fn snapshot_order(&self, other: &Self) -> std::cmp::Ordering {
        self.kind
            .cmp(&other.kind)
            .then_with(|| self.path.cmp(&other.path))
    }
}

impl fmt::Display for RouteEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<4} {:<7} {} ({})",
            self.kind,
            self.verb,
            self.uri,
            self.path.display()
        )
    }
}
