//! `[watch]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [watch]
//! debounce_ms = 300   # Quiet period before a batch of changes is applied
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// File watcher settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct WatchConfig {
    /// Debounce window in milliseconds.
    pub debounce_ms: u64,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self { debounce_ms: 300 }
    }
}

impl WatchConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

#[cfg(test)]
mod tests {
    use crate::config::test_parse_config;

    #[test]
    fn test_watch_config() {
        let config = test_parse_config("[watch]\ndebounce_ms = 50");
        assert_eq!(config.watch.debounce_ms, 50);
        assert_eq!(config.watch.debounce().as_millis(), 50);
    }

    #[test]
    fn test_watch_config_defaults() {
        let config = test_parse_config("");
        assert_eq!(config.watch.debounce_ms, 300);
    }
}
