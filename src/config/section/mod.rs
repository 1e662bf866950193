//! Configuration section definitions.
//!
//! | Module   | TOML Section | Purpose                          |
//! |----------|--------------|----------------------------------|
//! | `routes` | `[routes]`   | App directory, rpc naming, exts  |
//! | `watch`  | `[watch]`    | File watcher debounce            |

mod routes;
mod watch;

pub use routes::{RoutesConfig, RpcNaming};
pub use watch::WatchConfig;
