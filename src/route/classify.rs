//! Path classification: relative source path -> route entry.
//!
//! Pure functions only. Nothing here touches the filesystem, so the same
//! path always yields the same entry.
//!
//! ```text
//! app/api/auth.ts                       -> api   *    /api/auth
//! app/auth/pages/login.ts               -> page  get  /login
//! app/products/mutations/update.ts      -> rpc   post /api/rpc/update
//! app/products/queries/getProducts.ts   -> rpc   post /api/rpc/getProducts
//! app/products/components/Card.tsx      -> (not a route)
//! ```

use std::path::{Component, Path};

use super::{RouteEntry, RouteKind, Verb};
use crate::config::{RoutesConfig, RpcNaming};

const API_DIR: &str = "api";
const PAGES_DIR: &str = "pages";
const MUTATIONS_DIR: &str = "mutations";
const QUERIES_DIR: &str = "queries";
const INDEX_STEM: &str = "index";

/// URI prefix shared by all rpc endpoints.
pub const RPC_PREFIX: &str = "/api/rpc/";

/// Directory names that make a subtree of `app/` route-bearing.
pub const ROUTE_DIRS: [&str; 4] = [API_DIR, PAGES_DIR, QUERIES_DIR, MUTATIONS_DIR];

/// Classifies relative source paths into route entries.
#[derive(Debug, Clone)]
pub struct PathClassifier {
    app_dir: String,
    rpc_naming: RpcNaming,
    extensions: Vec<String>,
}

impl Default for PathClassifier {
    fn default() -> Self {
        Self::new(&RoutesConfig::default())
    }
}

impl PathClassifier {
    pub fn new(config: &RoutesConfig) -> Self {
        Self {
            app_dir: config.app_dir.clone(),
            rpc_naming: config.rpc_naming,
            extensions: config
                .extensions
                .iter()
                .map(|ext| ext.trim_start_matches('.').to_string())
                .collect(),
        }
    }

    pub fn with_rpc_naming(mut self, naming: RpcNaming) -> Self {
        self.rpc_naming = naming;
        self
    }

    #[inline]
    pub fn app_dir(&self) -> &str {
        &self.app_dir
    }

    #[inline]
    pub fn rpc_naming(&self) -> RpcNaming {
        self.rpc_naming
    }

    /// Classify a path relative to the project root.
    ///
    /// Returns `None` when the path is not a route (outside `app/`, not under
    /// a route directory, hidden, filtered extension, or not UTF-8).
    /// Rules are tried in order: api, pages, mutations, queries.
    pub fn classify(&self, path: &Path) -> Option<RouteEntry> {
        let segments = segments(path)?;
        let (file, dirs) = self.route_segments(&segments)?;

        if !self.accepts_extension(file) {
            return None;
        }
        let stem = strip_extension(file);

        if let Some(i) = position(dirs, API_DIR) {
            // Relative to the api directory's parent, so the uri keeps `api/`
            let uri = join_uri(collapse_index(&dirs[i..], stem));
            return Some(RouteEntry::new(path, uri, RouteKind::Api, Verb::Any));
        }

        if let Some(i) = position(dirs, PAGES_DIR) {
            let uri = join_uri(collapse_index(&dirs[i + 1..], stem));
            return Some(RouteEntry::new(path, uri, RouteKind::Page, Verb::Get));
        }

        for rpc_dir in [MUTATIONS_DIR, QUERIES_DIR] {
            if let Some(i) = position(dirs, rpc_dir) {
                let uri = self.rpc_uri(&dirs[i + 1..], stem);
                return Some(RouteEntry::new(path, uri, RouteKind::Rpc, Verb::Post));
            }
        }

        None
    }

    /// Cheap pre-check: does this path live in a route-bearing subtree?
    ///
    /// Directories count too, so a moved-in `app/x/queries` tree is relevant.
    /// Anything below a hidden segment is not.
    pub fn in_route_tree(&self, path: &Path) -> bool {
        let Some(segments) = segments(path) else {
            return false;
        };
        if segments.iter().any(|segment| is_hidden(segment)) {
            return false;
        }
        match segments.split_first() {
            Some((first, rest)) if *first == self.app_dir => {
                rest.iter().any(|segment| ROUTE_DIRS.contains(segment))
            }
            _ => false,
        }
    }

    /// Whether `path` is the app directory itself or lies beneath it.
    pub fn in_app_dir(&self, path: &Path) -> bool {
        segments(path).is_some_and(|s| s.first() == Some(&self.app_dir.as_str()))
    }

    /// Split into `(file name, directories between app/ and the file)`.
    fn route_segments<'a>(&self, segments: &'a [&'a str]) -> Option<(&'a str, &'a [&'a str])> {
        let (first, rest) = segments.split_first()?;
        if *first != self.app_dir || rest.iter().any(|segment| is_hidden(segment)) {
            return None;
        }
        let (file, dirs) = rest.split_last()?;
        Some((file, dirs))
    }

    fn rpc_uri(&self, nested_dirs: &[&str], stem: &str) -> String {
        match self.rpc_naming {
            RpcNaming::Basename => format!("{RPC_PREFIX}{stem}"),
            RpcNaming::Nested => {
                let mut name = nested_dirs.join("/");
                if !name.is_empty() {
                    name.push('/');
                }
                name.push_str(stem);
                format!("{RPC_PREFIX}{name}")
            }
        }
    }

    fn accepts_extension(&self, file: &str) -> bool {
        if self.extensions.is_empty() {
            return true;
        }
        extension(file).is_some_and(|ext| self.extensions.iter().any(|e| e == ext))
    }
}

/// Normal path components as `&str`.
///
/// `None` for absolute paths, parent traversal or non-UTF-8 names; the
/// scanner normalizes event paths before they get here.
fn segments(path: &Path) -> Option<Vec<&str>> {
    let mut out = Vec::new();
    for component in path.components() {
        match component {
            Component::Normal(name) => out.push(name.to_str()?),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    Some(out)
}

/// Dot-prefixed names (`.well-known`, `.auth.ts.swp`) never form routes;
/// the directory walk skips them as well.
fn is_hidden(segment: &str) -> bool {
    segment.starts_with('.')
}

fn position(dirs: &[&str], name: &str) -> Option<usize> {
    dirs.iter().position(|dir| *dir == name)
}

/// Strip only the final extension. Extensionless names are kept.
fn strip_extension(file: &str) -> &str {
    match file.rfind('.') {
        None | Some(0) => file,
        Some(i) => &file[..i],
    }
}

fn extension(file: &str) -> Option<&str> {
    match file.rfind('.') {
        None | Some(0) => None,
        Some(i) => Some(&file[i + 1..]),
    }
}

/// Directory parts plus stem, with a trailing `index` naming its directory.
fn collapse_index<'a>(dirs: &[&'a str], stem: &'a str) -> Vec<&'a str> {
    let mut parts = dirs.to_vec();
    if stem != INDEX_STEM {
        parts.push(stem);
    }
    parts
}

fn join_uri(parts: Vec<&str>) -> String {
    format!("/{}", parts.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn classify(path: &str) -> Option<RouteEntry> {
        PathClassifier::default().classify(&PathBuf::from(path))
    }

    fn uri(path: &str) -> String {
        classify(path).map(|e| e.uri).unwrap_or_default()
    }

    #[test]
    fn test_api_route() {
        let entry = classify("app/api/auth.ts").unwrap();
        assert_eq!(entry.path, PathBuf::from("app/api/auth.ts"));
        assert_eq!(entry.uri, "/api/auth");
        assert_eq!(entry.kind, RouteKind::Api);
        assert_eq!(entry.verb, Verb::Any);
    }

    #[test]
    fn test_scoped_api_route() {
        assert_eq!(uri("app/users/api/list.ts"), "/api/list");
        assert_eq!(uri("app/api/users/[id].ts"), "/api/users/[id]");
    }

    #[test]
    fn test_api_index_collapses() {
        assert_eq!(uri("app/api/index.ts"), "/api");
        assert_eq!(uri("app/api/webhooks/index.ts"), "/api/webhooks");
    }

    #[test]
    fn test_page_route() {
        let entry = classify("app/auth/pages/login.ts").unwrap();
        assert_eq!(entry.uri, "/login");
        assert_eq!(entry.kind, RouteKind::Page);
        assert_eq!(entry.verb, Verb::Get);
    }

    #[test]
    fn test_page_index_collapses() {
        assert_eq!(uri("app/pages/index.tsx"), "/");
        assert_eq!(uri("app/blog/pages/blog/index.tsx"), "/blog");
        assert_eq!(uri("app/blog/pages/blog/[slug].tsx"), "/blog/[slug]");
    }

    #[test]
    fn test_mutation_route() {
        let entry = classify("app/products/mutations/updateProduct.ts").unwrap();
        assert_eq!(entry.uri, "/api/rpc/updateProduct");
        assert_eq!(entry.kind, RouteKind::Rpc);
        assert_eq!(entry.verb, Verb::Post);
    }

    #[test]
    fn test_query_route() {
        let entry = classify("app/products/queries/getProducts.ts").unwrap();
        assert_eq!(entry.uri, "/api/rpc/getProducts");
        assert_eq!(entry.kind, RouteKind::Rpc);
        assert_eq!(entry.verb, Verb::Post);
    }

    #[test]
    fn test_rpc_basename_naming() {
        assert_eq!(
            uri("app/products/queries/nested/getX.ts"),
            "/api/rpc/getX"
        );
    }

    #[test]
    fn test_rpc_nested_naming() {
        let classifier = PathClassifier::default().with_rpc_naming(RpcNaming::Nested);
        let nested = classifier
            .classify(Path::new("app/products/queries/nested/getX.ts"))
            .unwrap();
        assert_eq!(nested.uri, "/api/rpc/nested/getX");

        let flat = classifier
            .classify(Path::new("app/products/queries/getProducts.ts"))
            .unwrap();
        assert_eq!(flat.uri, "/api/rpc/getProducts");
    }

    #[test]
    fn test_rule_priority() {
        // api wins over pages, pages over rpc dirs, mutations over queries
        assert_eq!(classify("app/api/pages/x.ts").unwrap().kind, RouteKind::Api);
        assert_eq!(classify("app/pages/queries/x.ts").unwrap().kind, RouteKind::Page);
        assert_eq!(uri("app/queries/mutations/x.ts"), "/api/rpc/x");
        assert_eq!(
            classify("app/a/pages/api/x.ts").unwrap().kind,
            RouteKind::Api
        );
    }

    #[test]
    fn test_non_routes() {
        assert!(classify("app/products/components/Card.tsx").is_none());
        assert!(classify("app/api.ts").is_none());
        assert!(classify("app/pages").is_none());
        assert!(classify("lib/api/auth.ts").is_none());
        assert!(classify("api/auth.ts").is_none());
        assert!(classify(".git/hooks/pre-commit").is_none());
        assert!(classify("app/api/.well-known/security.ts").is_none());
        assert!(classify("app/auth/pages/.draft.tsx").is_none());
        assert!(classify("").is_none());
    }

    #[test]
    fn test_segment_names_case_sensitive() {
        assert!(classify("app/API/auth.ts").is_none());
        assert!(classify("app/auth/Pages/login.ts").is_none());
        assert!(classify("App/api/auth.ts").is_none());
    }

    #[test]
    fn test_extensionless_file() {
        assert_eq!(uri("app/api/health"), "/api/health");
        assert_eq!(uri("app/products/queries/getAll"), "/api/rpc/getAll");
    }

    #[test]
    fn test_only_final_extension_stripped() {
        assert_eq!(uri("app/pages/about.page.tsx"), "/about.page");
        assert_eq!(uri("app/api/v1.2/status.ts"), "/api/v1.2/status");
    }

    #[test]
    fn test_rejects_unnormalized_paths() {
        assert!(classify("/app/api/auth.ts").is_none());
        assert!(classify("app/../app/api/auth.ts").is_none());
        assert_eq!(uri("./app/api/auth.ts"), "/api/auth");
    }

    #[test]
    fn test_extension_allow_list() {
        let config = RoutesConfig {
            extensions: vec!["ts".into(), ".tsx".into()],
            ..Default::default()
        };
        let classifier = PathClassifier::new(&config);
        assert!(classifier.classify(Path::new("app/pages/a.ts")).is_some());
        assert!(classifier.classify(Path::new("app/pages/b.tsx")).is_some());
        assert!(classifier.classify(Path::new("app/pages/c.md")).is_none());
        assert!(classifier.classify(Path::new("app/pages/d")).is_none());
    }

    #[test]
    fn test_custom_app_dir() {
        let config = RoutesConfig {
            app_dir: "src".into(),
            ..Default::default()
        };
        let classifier = PathClassifier::new(&config);
        assert_eq!(
            classifier.classify(Path::new("src/api/auth.ts")).unwrap().uri,
            "/api/auth"
        );
        assert!(classifier.classify(Path::new("app/api/auth.ts")).is_none());
    }

    #[test]
    fn test_classify_is_deterministic() {
        let classifier = PathClassifier::default();
        for path in [
            "app/api/auth.ts",
            "app/auth/pages/login.ts",
            "app/products/queries/getProducts.ts",
        ] {
            let a = classifier.classify(Path::new(path));
            let b = classifier.classify(Path::new(path));
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_in_route_tree() {
        let classifier = PathClassifier::default();
        assert!(classifier.in_route_tree(Path::new("app/api")));
        assert!(classifier.in_route_tree(Path::new("app/products/queries")));
        assert!(classifier.in_route_tree(Path::new("app/products/queries/get.ts")));
        assert!(!classifier.in_route_tree(Path::new("app/products")));
        assert!(!classifier.in_route_tree(Path::new("app/api/.well-known")));
        assert!(!classifier.in_route_tree(Path::new("app")));
        assert!(!classifier.in_route_tree(Path::new("pages/index.ts")));
    }

    #[test]
    fn test_in_app_dir() {
        let classifier = PathClassifier::default();
        assert!(classifier.in_app_dir(Path::new("app")));
        assert!(classifier.in_app_dir(Path::new("app/products")));
        assert!(!classifier.in_app_dir(Path::new("lib/app")));
    }
}
