//! Watch mode: keep the route list current until Ctrl+C.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::sync::{mpsc, watch};

use crate::config::ProjectConfig;
use crate::logger::{status_detach, status_error, status_success};
use crate::route::{RouteSink, collect, find_conflicts, print_conflicts};
use crate::scan::{self, RouteChange, RouteScanner};
use crate::utils::plural_count;
use crate::watch::FsWatcher;

/// Capacity of the watcher -> scanner channel.
const EVENT_BUFFER: usize = 256;

/// Run watch mode on a dedicated tokio runtime.
pub fn watch_routes(
    config: &ProjectConfig,
    sink: &mut impl RouteSink,
    stop: watch::Receiver<bool>,
) -> Result<()> {
    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .context("Failed to create tokio runtime")?;

    rt.block_on(run(config, sink, stop))
}

async fn run(
    config: &ProjectConfig,
    sink: &mut impl RouteSink,
    stop: watch::Receiver<bool>,
) -> Result<()> {
    let (event_tx, event_rx) = mpsc::channel(EVENT_BUFFER);

    // Watcher first: changes made during the initial build stay buffered
    let watcher = FsWatcher::new(config, event_tx).context("Failed to start file watcher")?;

    let cache = scan::build(config);
    let scanner = RouteScanner::from_config(config, Arc::clone(&cache));

    let routes = collect(&cache);
    print_conflicts(&find_conflicts(&routes));
    sink.write_routes(&routes)?;
    status_success(&format!(
        "watching {} ({})",
        config.app_path().display(),
        plural_count(routes.len(), "route")
    ));

    let watcher_handle = tokio::spawn(watcher.run(stop.clone()));

    scanner
        .run(event_rx, stop, |change| publish(&scanner, change, &mut *sink))
        .await;

    let _ = tokio::time::timeout(Duration::from_millis(500), watcher_handle).await;

    status_detach();
    crate::log!("watch"; "stopped");
    Ok(())
}

/// Rewrite the output after a burst of changes; a failed write is reported
/// and the watch goes on.
fn publish(scanner: &RouteScanner, change: &RouteChange, sink: &mut impl RouteSink) {
    let routes = collect(scanner.cache());
    status_detach();
    print_conflicts(&find_conflicts(&routes));

    match sink.write_routes(&routes) {
        Ok(()) => status_success(&format!(
            "{} ({})",
            plural_count(routes.len(), "route"),
            change.summary()
        )),
        Err(e) => status_error("failed to write routes", &format!("{e:#}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route::RouteEntry;
    use crate::utils::path::normalize_path;
    use tempfile::TempDir;

    #[test]
    fn test_watch_writes_initial_list_and_stops() {
        let temp = TempDir::new().unwrap();
        let root = normalize_path(temp.path());
        let file = root.join("app/api/auth.ts");
        std::fs::create_dir_all(file.parent().unwrap()).unwrap();
        std::fs::write(&file, "").unwrap();

        let config = ProjectConfig {
            root,
            ..Default::default()
        };

        let mut writes: Vec<Vec<RouteEntry>> = Vec::new();
        let mut sink = |routes: &[RouteEntry]| {
            writes.push(routes.to_vec());
            Ok::<(), anyhow::Error>(())
        };

        // Already stopped: initial list is written, then the loops exit.
        let (_stop_tx, stop_rx) = watch::channel(true);
        watch_routes(&config, &mut sink, stop_rx).unwrap();

        assert_eq!(writes.len(), 1);
        assert_eq!(writes[0].len(), 1);
        assert_eq!(writes[0][0].uri, "/api/auth");
    }
}
