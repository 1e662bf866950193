//! `[routes]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [routes]
//! app_dir = "app"            # First path segment routes live under
//! rpc_naming = "basename"    # "basename" or "nested"
//! extensions = ["ts", "tsx"] # Allowed source extensions (empty = all)
//! ```

use serde::{Deserialize, Serialize};

/// How rpc endpoint names are derived from files below `queries/` or
/// `mutations/`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RpcNaming {
    /// File stem only: `queries/nested/getX.ts` -> `/api/rpc/getX` (default).
    #[default]
    Basename,
    /// Keep the sub-path: `queries/nested/getX.ts` -> `/api/rpc/nested/getX`.
    Nested,
}

/// Route classification settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RoutesConfig {
    /// Directory (relative to the project root) that holds route trees.
    pub app_dir: String,

    /// Rpc endpoint naming.
    pub rpc_naming: RpcNaming,

    /// Source extensions that may become routes, without the dot.
    /// Empty accepts every file, including extensionless ones.
    pub extensions: Vec<String>,
}

impl Default for RoutesConfig {
    fn default() -> Self {
        Self {
            app_dir: "app".to_string(),
            rpc_naming: RpcNaming::Basename,
            extensions: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_routes_config() {
        let config = test_parse_config(
            "[routes]\napp_dir = \"src\"\nrpc_naming = \"nested\"\nextensions = [\"ts\"]",
        );

        assert_eq!(config.routes.app_dir, "src");
        assert_eq!(config.routes.rpc_naming, RpcNaming::Nested);
        assert_eq!(config.routes.extensions, vec!["ts".to_string()]);
    }

    #[test]
    fn test_routes_config_defaults() {
        let config = test_parse_config("");

        assert_eq!(config.routes.app_dir, "app");
        assert_eq!(config.routes.rpc_naming, RpcNaming::Basename);
        assert!(config.routes.extensions.is_empty());
    }

    #[test]
    fn test_invalid_rpc_naming() {
        let result: Result<RoutesConfig, _> = toml::from_str("rpc_naming = \"flat\"");
        assert!(result.is_err());
    }
}
