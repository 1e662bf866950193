//! Utility modules.
//!
//! - [`path`]: Filesystem path normalization (`normalize_path`)
//! - [`plural`]: Pluralization helpers for log output

pub mod path;
mod plural;

pub use plural::{plural_count, plural_s};
