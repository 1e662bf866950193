//! Project configuration management for `fsroutes.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── routes     # [routes]
//! │   └── watch      # [watch]
//! ├── error          # ConfigError
//! ├── util           # Config file lookup
//! └── mod.rs         # ProjectConfig (this file)
//! ```
//!
//! The config file is optional. Without one, every section takes its
//! defaults and the project root is the current directory (or `--root`).

mod error;
pub mod section;
mod util;

pub use error::ConfigError;
pub use section::{RoutesConfig, RpcNaming, WatchConfig};
use util::find_config_file;

use std::fs;
use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::cli::Cli;
use crate::log;
use crate::utils::path::normalize_path;

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing fsroutes.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Absolute path to the config file, whether or not it exists
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Project root directory (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    /// Route classification settings
    #[serde(default)]
    pub routes: RoutesConfig,

    /// File watcher settings
    #[serde(default)]
    pub watch: WatchConfig,
}

impl ProjectConfig {
    /// Load configuration from CLI arguments.
    ///
    /// With `--root`, the config file is looked up inside that directory.
    /// Otherwise the config file is searched upward from cwd and its parent
    /// becomes the project root; if none is found, cwd is the root.
    pub fn load(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;
        let (root, config_path) = Self::resolve_root(cli, &cwd);

        let root = normalize_path(&root);
        if !root.is_dir() {
            return Err(ConfigError::Root(root).into());
        }

        let mut config = if config_path.is_file() {
            Self::from_path(&config_path)?
        } else {
            crate::debug!("config"; "no {} found, using defaults", cli.config.display());
            Self::default()
        };

        config.root = root;
        config.config_path = config_path;
        config.apply_cli(cli);
        config.validate()?;

        Ok(config)
    }

    fn resolve_root(cli: &Cli, cwd: &Path) -> (PathBuf, PathBuf) {
        if let Some(root) = &cli.root {
            let root = cwd.join(root);
            let config_path = root.join(&cli.config);
            return (root, config_path);
        }

        match find_config_file(&cli.config, cwd) {
            Some(path) => {
                let root = path.parent().map(Path::to_path_buf).unwrap_or_default();
                (root, path)
            }
            None => (cwd.to_path_buf(), cwd.join(&cli.config)),
        }
    }

    /// Apply command-line overrides on top of file values.
    fn apply_cli(&mut self, cli: &Cli) {
        if let Some(naming) = cli.rpc_naming {
            self.routes.rpc_naming = naming;
        }
    }

    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(ConfigError::from)?;
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>)> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })
        .map_err(ConfigError::from)?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {}", field);
        }
    }

    /// Validate settings that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let app_dir = &self.routes.app_dir;
        let mut components = Path::new(app_dir).components();
        let single_normal = matches!(components.next(), Some(Component::Normal(_)))
            && components.next().is_none();

        if !single_normal {
            return Err(ConfigError::Validation(format!(
                "routes.app_dir must be a single directory name, got `{app_dir}`"
            )));
        }

        if self.routes.extensions.iter().any(|ext| ext.trim_start_matches('.').is_empty()) {
            return Err(ConfigError::Validation(
                "routes.extensions must not contain empty entries".to_string(),
            ));
        }

        Ok(())
    }

    /// Absolute path of the app directory.
    pub fn app_path(&self) -> PathBuf {
        self.root.join(&self.routes.app_dir)
    }
}

/// Parse a config snippet for tests, failing on unknown fields.
#[cfg(test)]
pub fn test_parse_config(content: &str) -> ProjectConfig {
    let (parsed, ignored) = ProjectConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

// ============================================================================
// tests
// ============================================================================
