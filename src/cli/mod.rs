//! Command-line front end: argument parsing, JSON output, and the
//! one-shot and watch commands.

mod args;
mod list;
mod output;
mod watch;

pub use args::Cli;
pub use list::list_routes;
pub use output::JsonSink;
pub use watch::watch_routes;

use anyhow::Result;

use crate::config::ProjectConfig;

/// Dispatch to one-shot or watch mode.
pub fn run(cli: &Cli, config: &ProjectConfig) -> Result<()> {
    let mut sink = JsonSink::from_cli(cli);

    if cli.watch {
        let stop = setup_shutdown_handler()?;
        watch_routes(config, &mut sink, stop)
    } else {
        list_routes(config, &mut sink)
    }
}

/// Install the Ctrl+C handler; the returned receiver turns true on signal.
pub fn setup_shutdown_handler() -> Result<tokio::sync::watch::Receiver<bool>> {
    let (stop_tx, stop_rx) = tokio::sync::watch::channel(false);

    ctrlc::set_handler(move || {
        crate::log!("watch"; "shutting down...");
        let _ = stop_tx.send(true);
    })
    .map_err(|e| anyhow::anyhow!("failed to set Ctrl+C handler: {}", e))?;

    Ok(stop_rx)
}
