//! Logging utilities with colored output.
//!
//! This module provides:
//! - `log!` macro for formatted terminal output with colored prefixes
//! - `debug!` macro gated on `--verbose`
//! - `WatchStatus` for watch mode status messages
//!
//! Everything goes to stderr; stdout is reserved for route output.
//!
//! # Example
//!
//! ```ignore
//! log!("scan"; "found {} routes", count);
//! debug!("watch"; "event {}: {}", kind, path.display());
//! status_success("3 routes");
//! ```

use crossterm::{
    cursor, execute,
    terminal::{Clear, ClearType},
};
use owo_colors::OwoColorize;
use parking_lot::Mutex;
use std::{
    io::{Write, stderr},
    sync::LazyLock,
    sync::atomic::{AtomicBool, Ordering},
};

/// Global verbose flag (set by --verbose CLI argument)
static VERBOSE: AtomicBool = AtomicBool::new(false);

/// Set verbose mode globally
pub fn set_verbose(v: bool) {
    VERBOSE.store(v, Ordering::SeqCst);
}

/// Check if verbose mode is enabled
pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::SeqCst)
}

// ============================================================================
// Log Macro
// ============================================================================

/// Log a message with a colored module prefix
///
/// # Usage
/// ```ignore
/// log!("module"; "message with {} formatting", args);
/// ```
#[macro_export]
macro_rules! log {
    ($module:expr; $($arg:tt)*) => {{
        $crate::logger::log($module, &format!($($arg)*))
    }};
}

/// Log a debug message (only shown when --verbose is enabled)
///
/// # Usage
/// ```ignore
/// debug!("module"; "debug info: {}", value);
/// ```
#[macro_export]
macro_rules! debug {
    ($module:expr; $($arg:tt)*) => {{
        if $crate::logger::is_verbose() {
            $crate::logger::log($module, &format!($($arg)*))
        }
    }};
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Write one `[module] message` line to stderr.
///
/// Clears the rest of the terminal line first so a line printed over a
/// partially drawn status block stays readable.
pub fn log(module: &str, message: &str) {
    let prefix = colorize_prefix(module);

    let mut stderr = stderr().lock();
    execute!(stderr, Clear(ClearType::UntilNewLine)).ok();
    writeln!(stderr, "{prefix} {message}").ok();
    stderr.flush().ok();
}

/// `[module]` in bold, colored by module (case-insensitive).
fn colorize_prefix(module: &str) -> String {
    let prefix = format!("[{module}]").bold().to_string();
    match module.to_ascii_lowercase().as_str() {
        "scan" => prefix.bright_blue().to_string(),
        "watch" => prefix.bright_green().to_string(),
        "error" => prefix.bright_red().to_string(),
        "warning" => prefix.bright_magenta().to_string(),
        _ => prefix.bright_yellow().to_string(),
    }
}

// ============================================================================
// Watch Status (single-line status with overwrite)
// ============================================================================

/// Current UTC time formatted as HH:MM:SS
fn now() -> String {
    use std::time::SystemTime;
    let secs = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let hours = (secs / 3600) % 24;
    let minutes = (secs / 60) % 60;
    let seconds = secs % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}

/// Single-line status display for watch mode
///
/// Each message overwrites the previous block, so a long watch session keeps
/// one status block instead of scrolling. Log lines printed in between must
/// call [`WatchStatus::detach`] first.
///
/// ```ignore
/// let mut status = WatchStatus::new();
/// status.success("12 routes (+1 ~0 -0)");
/// status.error("failed to write routes", "permission denied");
/// ```
pub struct WatchStatus {
    /// Height of the block currently on screen
    last_lines: usize,
}

/// Shared by the initial build and the per-burst updates of watch mode.
static WATCH_STATUS: LazyLock<Mutex<WatchStatus>> =
    LazyLock::new(|| Mutex::new(WatchStatus::new()));

impl WatchStatus {
    pub const fn new() -> Self {
        Self { last_lines: 0 }
    }

    pub fn success(&mut self, message: &str) {
        self.display("✓".green().to_string(), message);
    }

    /// `detail` goes on its own lines below the summary when non-empty.
    pub fn error(&mut self, summary: &str, detail: &str) {
        let message = match detail {
            "" => summary.to_string(),
            detail => format!("{summary}\n{detail}"),
        };
        self.display("✗".red().to_string(), &message);
    }

    fn display(&mut self, mark: String, message: &str) {
        let mut stderr = stderr().lock();

        if let Ok(lines) = u16::try_from(self.last_lines)
            && lines > 0
        {
            execute!(stderr, cursor::MoveUp(lines), Clear(ClearType::FromCursorDown)).ok();
        }

        let stamp = format!("[{}]", now()).dimmed().to_string();
        writeln!(stderr, "{stamp} {mark} {message}").ok();
        stderr.flush().ok();

        self.last_lines = line_count(message);
    }

    /// Keep the current block on screen; the next message starts below it.
    pub fn detach(&mut self) {
        self.last_lines = 0;
    }
}

impl Default for WatchStatus {
    fn default() -> Self {
        Self::new()
    }
}

fn line_count(message: &str) -> usize {
    message.lines().count().max(1)
}

pub fn status_success(message: &str) {
    WATCH_STATUS.lock().success(message);
}

pub fn status_error(summary: &str, detail: &str) {
    WATCH_STATUS.lock().error(summary, detail);
}

/// Global watch status: keep the current block on screen
pub fn status_detach() {
    WATCH_STATUS.lock().detach();
}

// ============================================================================
// Tests
// ============================================================================
