//! Route types: classification, storage and collection.
//!
//! ```text
//! path ──► PathClassifier ──► RouteEntry ──► RouteCache ──► collect() ──► sink
//! ```

mod cache;
mod classify;
mod collect;
mod entry;

pub use cache::{RouteCache, Upsert};
pub use classify::{PathClassifier, ROUTE_DIRS, RPC_PREFIX};
pub use collect::{RouteConflict, RouteSink, collect, find_conflicts, print_conflicts};
pub use entry::{RouteEntry, RouteKind, Verb};
