//! Filesystem watcher
//!
//! Watches the app directory and feeds debounced events to the route scanner.
//! The watcher starts before the initial build, so nothing changed during
//! the build is lost.
//!
//! Architecture:
//! ```text
//! notify → Debouncer (pure timing) → EventClassifier (existence) → FsEvent
//! ```

use std::path::PathBuf;
use std::time::Duration;

use notify::RecommendedWatcher;
use tokio::sync::{mpsc, watch};

use crate::config::ProjectConfig;
use crate::scan::FsEvent;

// Existence correction (raw changes -> actionable events).
mod classifier;
// Pure timing and deduplication.
mod debouncer;
// Shared watcher event types.
mod types;
// Watch root attach/re-attach lifecycle.
mod watch_roots;


use classifier::EventClassifier;
use debouncer::Debouncer;
use watch_roots::{RootChanges, WatchRoots};

/// How often a missing app directory is checked for.
const ROOT_POLL: Duration = Duration::from_secs(1);

/// Filesystem watcher feeding `FsEvent`s into the scanner channel
pub struct FsWatcher {
    /// Channel to receive notify events (sync -> async bridge)
    notify_rx: std::sync::mpsc::Receiver<notify::Result<notify::Event>>,
    /// Watcher handle (must be kept alive)
    watcher: RecommendedWatcher,
    watch_roots: WatchRoots,
    event_tx: mpsc::Sender<FsEvent>,
    debouncer: Debouncer,
}

impl FsWatcher {
    /// Start watching the app directory immediately; events buffer until
    /// [`FsWatcher::run`] is polled.
    pub fn new(config: &ProjectConfig, event_tx: mpsc::Sender<FsEvent>) -> notify::Result<Self> {
        Self::with_paths(vec![config.app_path()], config.watch.debounce(), event_tx)
    }

    pub fn with_paths(
        paths: Vec<PathBuf>,
        debounce: Duration,
        event_tx: mpsc::Sender<FsEvent>,
    ) -> notify::Result<Self> {
        // notify delivers on its own thread; it doesn't support async
        let (notify_tx, notify_rx) = std::sync::mpsc::channel();

        let mut watcher = notify::recommended_watcher(move |res| {
            let _ = notify_tx.send(res);
        })?;

        let mut watch_roots = WatchRoots::new(paths);
        watch_roots.attach_existing(&mut watcher)?;

        Ok(Self {
            notify_rx,
            watcher,
            watch_roots,
            event_tx,
            debouncer: Debouncer::new(debounce),
        })
    }

    /// Run until `stop` turns true (or its sender is dropped), or the
    /// scanner side of the channel closes.
    pub async fn run(self, mut stop: watch::Receiver<bool>) {
        let notify_rx = self.notify_rx;
        let event_tx = self.event_tx;
        let mut debouncer = self.debouncer;
        let mut watcher = self.watcher;
        let mut watch_roots = self.watch_roots;

        let (async_tx, mut async_rx) = mpsc::channel::<notify::Event>(64);

        // Bridge thread; exits once the watcher or the async side is dropped
        std::thread::spawn(move || {
            while let Ok(result) = notify_rx.recv() {
                match result {
                    Ok(event) => {
                        if async_tx.blocking_send(event).is_err() {
                            break;
                        }
                    }
                    Err(e) => crate::log!("watch"; "notify error: {}", e),
                }
            }
        });

        if *stop.borrow_and_update() {
            return;
        }

        loop {
            let sleep = if watch_roots.all_attached() {
                debouncer.sleep_duration()
            } else {
                debouncer.sleep_duration().min(ROOT_POLL)
            };

            tokio::select! {
                biased;
                changed = stop.changed() => {
                    if changed.is_err() || *stop.borrow_and_update() {
                        crate::debug!("watch"; "stopping watcher");
                        break;
                    }
                }
                Some(event) = async_rx.recv() => debouncer.add_event(&event),
                _ = tokio::time::sleep(sleep) => {
                    let roots = watch_roots.maintain(&mut watcher);
                    if process_changes(&mut debouncer, roots, &event_tx).await.is_err() {
                        crate::debug!("watch"; "scanner gone, stopping watcher");
                        break;
                    }
                }
            }
        }
    }
}

/// Forward root changes and debounced file changes to the scanner.
///
/// Returns `Err(())` if the scanner shut down.
async fn process_changes(
    debouncer: &mut Debouncer,
    roots: RootChanges,
    event_tx: &mpsc::Sender<FsEvent>,
) -> Result<(), ()> {
    let mut events: Vec<FsEvent> = roots
        .lost
        .into_iter()
        .map(FsEvent::remove)
        .chain(roots.attached.into_iter().map(FsEvent::add))
        .collect();

    if let Some(raw) = debouncer.take_if_ready()
        && let Some(debounced) = EventClassifier::classify(raw)
    {
        events.extend(debounced.into_fs_events());
    }

    for event in events {
        crate::debug!("watch"; "{}: {}", event.kind, event.path.display());
        event_tx.send(event).await.map_err(|_| ())?;
    }

    Ok(())
}
