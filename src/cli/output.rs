//! JSON route output.

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::cli::Cli;
use crate::log;
use crate::route::{RouteEntry, RouteSink};

/// Writes the route list as a JSON array to stdout or a file.
///
/// A file is rewritten in full on every call, so in watch mode it always
/// holds the latest list.
#[derive(Debug, Clone, Default)]
pub struct JsonSink {
    pretty: bool,
    output: Option<PathBuf>,
}

impl JsonSink {
    pub fn new(pretty: bool, output: Option<PathBuf>) -> Self {
        Self { pretty, output }
    }

    pub fn from_cli(cli: &Cli) -> Self {
        Self::new(cli.pretty, cli.output.clone())
    }

    pub fn format(&self, routes: &[RouteEntry]) -> Result<String> {
        let formatted = if self.pretty {
            serde_json::to_string_pretty(routes)?
        } else {
            serde_json::to_string(routes)?
        };
        Ok(formatted)
    }
}

impl RouteSink for JsonSink {
    fn write_routes(&mut self, routes: &[RouteEntry]) -> Result<()> {
        let formatted = self.format(routes)?;

        if let Some(ref output_path) = self.output {
            let mut file = fs::File::create(output_path)
                .with_context(|| format!("cannot create {}", output_path.display()))?;
            writeln!(file, "{formatted}")?;
            crate::debug!("output"; "wrote {} routes to {}", routes.len(), output_path.display());
        } else {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{formatted}")?;
            stdout.flush()?;
        }

        if routes.is_empty() {
            log!("output"; "no routes found");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route::{RouteKind, Verb};
    use tempfile::TempDir;

    fn routes() -> Vec<RouteEntry> {
        vec![
            RouteEntry::new("app/api/auth.ts", "/api/auth", RouteKind::Api, Verb::Any),
            RouteEntry::new("app/auth/pages/login.ts", "/login", RouteKind::Page, Verb::Get),
        ]
    }

    #[test]
    fn test_compact_format() {
        let sink = JsonSink::new(false, None);
        let json = sink.format(&routes()).unwrap();
        assert!(json.starts_with(r#"[{"path":"app/api/auth.ts","uri":"/api/auth","type":"api","verb":"*"}"#));
        assert!(!json.contains('\n'));
    }

    #[test]
    fn test_pretty_format() {
        let sink = JsonSink::new(true, None);
        let json = sink.format(&routes()).unwrap();
        assert!(json.contains("\n  {"));
    }

    #[test]
    fn test_empty_list() {
        let sink = JsonSink::default();
        assert_eq!(sink.format(&[]).unwrap(), "[]");
    }

    #[test]
    fn test_write_to_file_overwrites() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("routes.json");
        let mut sink = JsonSink::new(false, Some(path.clone()));

        sink.write_routes(&routes()).unwrap();
        sink.write_routes(&routes()[..1]).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(parsed.as_array().unwrap().len(), 1);
        assert_eq!(parsed[0]["uri"], "/api/auth");
    }

    #[test]
    fn test_write_to_missing_dir_fails() {
        let temp = TempDir::new().unwrap();
        let mut sink = JsonSink::new(false, Some(temp.path().join("missing/routes.json")));
        assert!(sink.write_routes(&routes()).is_err());
    }
}
