//! Route collection: cache snapshot -> public route list.
//!
//! Also hosts uri conflict detection and the sink seam used by manifest
//! writers.

use std::collections::BTreeMap;
use std::path::PathBuf;

use super::{RouteCache, RouteEntry, Verb};
use crate::log;
use crate::utils::plural_s;

/// Materialize the cache for external consumers.
pub fn collect(cache: &RouteCache) -> Vec<RouteEntry> {
    cache.snapshot().as_ref().clone()
}

/// Consumer of a collected route list (manifest writer, dev server table).
pub trait RouteSink {
    fn write_routes(&mut self, routes: &[RouteEntry]) -> anyhow::Result<()>;
}

impl<F> RouteSink for F
where
    F: FnMut(&[RouteEntry]) -> anyhow::Result<()>,
{
    fn write_routes(&mut self, routes: &[RouteEntry]) -> anyhow::Result<()> {
        self(routes)
    }
}

/// Multiple source files answering the same request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteConflict {
    pub uri: String,
    /// `(source path, verb)` for every claimant, in snapshot order.
    pub sources: Vec<(PathBuf, Verb)>,
}

/// Find uris claimed by more than one file with overlapping verbs.
///
/// Conflicting routes stay in the collected list; this only reports them.
/// Output is sorted by uri.
pub fn find_conflicts(routes: &[RouteEntry]) -> Vec<RouteConflict> {
    let mut by_uri: BTreeMap<&str, Vec<&RouteEntry>> = BTreeMap::new();
    for route in routes {
        by_uri.entry(route.uri.as_str()).or_default().push(route);
    }

    by_uri
        .into_iter()
        .filter(|(_, claimants)| has_overlap(claimants))
        .map(|(uri, claimants)| RouteConflict {
            uri: uri.to_string(),
            sources: claimants
                .into_iter()
                .map(|r| (r.path.clone(), r.verb))
                .collect(),
        })
        .collect()
}

fn has_overlap(claimants: &[&RouteEntry]) -> bool {
    claimants.iter().enumerate().any(|(i, a)| {
        claimants[i + 1..]
            .iter()
            .any(|b| a.verb.overlaps(b.verb))
    })
}

/// Print conflicts using the standard log format.
///
/// ```text
/// [error] route conflicts (1 uri)
/// [uri] /api/rpc/getUser (2 sources)
///   - post app/users/queries/getUser.ts
///   - post app/admin/queries/getUser.ts
/// ```
pub fn print_conflicts(conflicts: &[RouteConflict]) {
    if conflicts.is_empty() {
        return;
    }

    log!("error"; "route conflicts ({} uri{})", conflicts.len(), plural_s(conflicts.len()));
    for conflict in conflicts {
        log!("uri"; "{} ({} source{})", conflict.uri, conflict.sources.len(), plural_s(conflict.sources.len()));
        for (path, verb) in &conflict.sources {
            eprintln!("  - {} {}", verb, path.display());
        }
    }
}
