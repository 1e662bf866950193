//! fsroutes: file-system routing for file-routed web apps.
//!
//! Classifies source files under `app/**/{api,pages,queries,mutations}`
//! into routes, keeps them in a concurrent cache, and keeps that cache
//! current from filesystem events.

pub mod cli;
pub mod config;
pub mod logger;
pub mod route;
pub mod scan;
pub mod utils;
pub mod watch;
