//! One-shot route listing.

use anyhow::Result;

use crate::config::ProjectConfig;
use crate::route::{RouteSink, collect, find_conflicts, print_conflicts};
use crate::scan;
use crate::utils::plural_count;

/// Build the route set once, report conflicts and write it out.
pub fn list_routes(config: &ProjectConfig, sink: &mut impl RouteSink) -> Result<()> {
    let cache = scan::build(config);
    let routes = collect(&cache);

    crate::debug!("scan"; "found {}", plural_count(routes.len(), "route"));
    print_conflicts(&find_conflicts(&routes));

    sink.write_routes(&routes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route::RouteEntry;
    use crate::utils::path::normalize_path;
    use tempfile::TempDir;

    #[test]
    fn test_list_routes_writes_sorted_snapshot() {
        let temp = TempDir::new().unwrap();
        let root = normalize_path(temp.path());
        for file in [
            "app/products/queries/getProducts.ts",
            "app/api/auth.ts",
            "app/auth/pages/login.ts",
        ] {
            let path = root.join(file);
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(path, "").unwrap();
        }

        let config = ProjectConfig {
            root,
            ..Default::default()
        };

        let mut written: Vec<RouteEntry> = Vec::new();
        let mut sink = |routes: &[RouteEntry]| {
            written = routes.to_vec();
            Ok::<(), anyhow::Error>(())
        };
        list_routes(&config, &mut sink).unwrap();

        let uris: Vec<_> = written.iter().map(|r| r.uri.as_str()).collect();
        assert_eq!(uris, ["/api/auth", "/login", "/api/rpc/getProducts"]);
    }
}
