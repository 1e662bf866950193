//! Route scanner: file events -> route cache.
//!
//! Architecture:
//! ```text
//! FsEvent ─► relativize ─► relevance filter ─► PathClassifier ─► RouteCache
//!                                 │ (not a route)
//!                                 └─► drop stale entry
//! ```
//!
//! Two modes share the same `apply` step:
//! - one-shot: [`RouteScanner::scan_files`] / [`build`] over a finite list
//! - watch: [`RouteScanner::run`] over a channel until stopped

mod event;
mod walk;


pub use event::{FsEvent, FsEventKind, RouteChange, ScanError};
pub use walk::walk_files;

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use rayon::prelude::*;
use tokio::sync::{mpsc, watch};

use crate::config::ProjectConfig;
use crate::route::{PathClassifier, RouteCache, RouteEntry, Upsert};
use crate::utils::path::normalize_parent;
use crate::{debug, log};

/// Drives classification and cache updates for one project root.
#[derive(Debug, Clone)]
pub struct RouteScanner {
    root: PathBuf,
    classifier: PathClassifier,
    cache: Arc<RouteCache>,
}

impl RouteScanner {
    /// `root` should be canonical; absolute event paths are resolved
    /// against it.
    pub fn new(root: impl Into<PathBuf>, classifier: PathClassifier, cache: Arc<RouteCache>) -> Self {
        Self {
            root: root.into(),
            classifier,
            cache,
        }
    }

    pub fn from_config(config: &ProjectConfig, cache: Arc<RouteCache>) -> Self {
        Self::new(&config.root, PathClassifier::new(&config.routes), cache)
    }

    #[inline]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[inline]
    pub fn cache(&self) -> &Arc<RouteCache> {
        &self.cache
    }

    #[inline]
    pub fn classifier(&self) -> &PathClassifier {
        &self.classifier
    }

    /// Apply one event. Malformed paths are logged and skipped.
    pub fn apply(&self, event: &FsEvent) -> RouteChange {
        let rel = match self.relativize(&event.path) {
            Ok(rel) => rel,
            Err(ScanError::EmptyPath) => return RouteChange::default(),
            Err(err) => {
                log!("scan"; "skipped {} event: {}", event.kind, err);
                return RouteChange::default();
            }
        };

        debug!("scan"; "{}: {}", event.kind, rel.display());

        match event.kind {
            FsEventKind::Remove => self.remove(&rel),
            FsEventKind::Add | FsEventKind::Update if self.root.join(&rel).is_dir() => {
                self.add_dir(&rel)
            }
            FsEventKind::Add | FsEventKind::Update => self.upsert(rel),
        }
    }

    /// One-shot pass: every path is applied as an `Add`.
    pub fn scan_files<I, P>(&self, files: I) -> RouteChange
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let mut change = RouteChange::default();
        for file in files {
            change.merge(self.apply(&FsEvent::add(file)));
        }
        change
    }

    /// Watch mode: apply events in arrival order until `stop` turns true,
    /// its sender is dropped, or the event source closes.
    ///
    /// Events already queued are drained as one burst and reported through
    /// `on_change` once. After stop nothing more is applied; the cache keeps
    /// its last state.
    pub async fn run<F>(
        &self,
        mut events: mpsc::Receiver<FsEvent>,
        mut stop: watch::Receiver<bool>,
        mut on_change: F,
    ) where
        F: FnMut(&RouteChange),
    {
        if *stop.borrow_and_update() {
            return;
        }

        loop {
            tokio::select! {
                biased;
                changed = stop.changed() => {
                    if changed.is_err() || *stop.borrow_and_update() {
                        break;
                    }
                }
                event = events.recv() => {
                    let Some(event) = event else {
                        debug!("watch"; "event source closed");
                        break;
                    };

                    let mut change = self.apply(&event);
                    while !*stop.borrow() {
                        match events.try_recv() {
                            Ok(event) => change.merge(self.apply(&event)),
                            Err(_) => break,
                        }
                    }

                    if !change.is_empty() {
                        on_change(&change);
                    }
                }
            }
        }
    }

    /// Resolve an event path to a clean path relative to the root.
    fn relativize(&self, path: &Path) -> Result<PathBuf, ScanError> {
        let rel = if path.is_absolute() {
            match path.strip_prefix(&self.root) {
                Ok(rel) => rel.to_path_buf(),
                // Event paths may come through a symlinked or non-canonical
                // parent; deleted files cannot be canonicalized themselves.
                Err(_) => normalize_parent(path)
                    .strip_prefix(&self.root)
                    .map(Path::to_path_buf)
                    .map_err(|_| ScanError::OutsideRoot(path.to_path_buf()))?,
            }
        } else {
            path.to_path_buf()
        };

        let mut clean = PathBuf::new();
        for component in rel.components() {
            match component {
                Component::Normal(name) => {
                    if name.to_str().is_none() {
                        return Err(ScanError::NonUtf8(path.to_path_buf()));
                    }
                    clean.push(name);
                }
                Component::CurDir => {}
                Component::ParentDir => return Err(ScanError::ParentTraversal(path.to_path_buf())),
                Component::RootDir | Component::Prefix(_) => {
                    return Err(ScanError::OutsideRoot(path.to_path_buf()));
                }
            }
        }

        if clean.as_os_str().is_empty() {
            return Err(ScanError::EmptyPath);
        }
        Ok(clean)
    }

    /// Classify and store, or drop a stale entry if the path stopped
    /// being a route.
    fn upsert(&self, rel: PathBuf) -> RouteChange {
        let entry = if self.classifier.in_route_tree(&rel) {
            self.classifier.classify(&rel)
        } else {
            None
        };

        match entry {
            Some(entry) => self.store(rel, entry),
            None => self.remove_file(&rel),
        }
    }

    fn store(&self, rel: PathBuf, entry: RouteEntry) -> RouteChange {
        let mut change = RouteChange::default();
        match self.cache.upsert(rel, entry.clone()) {
            Upsert::Inserted => change.added.push(entry),
            Upsert::Replaced(previous) if previous != entry => change.updated.push(entry),
            Upsert::Replaced(_) => {}
        }
        change
    }

    fn remove_file(&self, rel: &Path) -> RouteChange {
        RouteChange {
            removed: self.cache.remove(rel).into_iter().collect(),
            ..Default::default()
        }
    }

    /// A removed path is either a cached file or a directory holding some.
    fn remove(&self, rel: &Path) -> RouteChange {
        let change = self.remove_file(rel);
        if !change.is_empty() {
            return change;
        }
        RouteChange {
            removed: self.cache.remove_under(rel),
            ..Default::default()
        }
    }

    /// A directory appeared or was touched: (re)classify every file below it.
    fn add_dir(&self, rel: &Path) -> RouteChange {
        if !self.classifier.in_app_dir(rel) {
            return RouteChange::default();
        }

        let (files, errors) = walk_files(&self.root.join(rel));
        for err in errors {
            log!("scan"; "skipped: {}", err);
        }

        let mut change = RouteChange::default();
        for file in files {
            change.merge(self.apply(&FsEvent::add(file)));
        }
        change
    }
}

/// One-shot build: enumerate the app directory and classify every file.
///
/// Classification runs in parallel; results are stored afterwards, so the
/// cache content does not depend on walk or thread scheduling order.
pub fn build(config: &ProjectConfig) -> Arc<RouteCache> {
    let cache = Arc::new(RouteCache::create());
    let scanner = RouteScanner::from_config(config, Arc::clone(&cache));

    let (files, errors) = walk_files(&config.app_path());
    for err in &errors {
        log!("scan"; "skipped: {}", err);
    }

    let entries: Vec<(PathBuf, RouteEntry)> = files
        .par_iter()
        .filter_map(|file| match scanner.relativize(file) {
            Ok(rel) => Some(rel),
            Err(err) => {
                log!("scan"; "skipped: {}", err);
                None
            }
        })
        .filter(|rel| scanner.classifier.in_route_tree(rel))
        .filter_map(|rel| scanner.classifier.classify(&rel).map(|entry| (rel, entry)))
        .collect();

    debug!("scan"; "{} files, {} routes", files.len(), entries.len());

    for (rel, entry) in entries {
        cache.upsert(rel, entry);
    }
    cache
}
