use std::borrow::Cow;
use std::collections::HashMap;

use crate::{
    chunks::LazyComponent,
    models::{LoadKind, RouteInfo},
    views::{self, View},
};

/// Component
///
/// What a route renders: a view bundled with the shell, or a deferred loader
/// for a separately fetched chunk.
#[derive(Clone, Debug)]
pub enum Component {
    Eager(View),
    Lazy(LazyComponent),
}

impl Component {
    pub fn load_kind(&self) -> LoadKind {
        match self {
            Component::Eager(_) => LoadKind::Eager,
            Component::Lazy(_) => LoadKind::Lazy,
        }
    }

    pub fn chunk(&self) -> Option<&str> {
        match self {
            Component::Eager(_) => None,
            Component::Lazy(lazy) => Some(lazy.chunk()),
        }
    }
}

/// Route
///
/// One entry of the route table.
#[derive(Clone, Debug)]
pub struct Route {
    /// Location path matched against the normalized browser path.
    pub path: String,
    /// Symbolic identifier, expected to be unique within a table.
    pub name: String,
    pub component: Component,
}

impl Route {
    pub fn eager(path: impl Into<String>, name: impl Into<String>, view: View) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            component: Component::Eager(view),
        }
    }

    pub fn lazy(path: impl Into<String>, name: impl Into<String>, chunk: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            component: Component::Lazy(LazyComponent::new(chunk)),
        }
    }

    pub fn info(&self) -> RouteInfo {
        RouteInfo {
            path: self.path.clone(),
            name: self.name.clone(),
            load: self.component.load_kind(),
            chunk: self.component.chunk().map(str::to_string),
        }
    }
}

/// RouteTable
///
/// Ordered, immutable list of routes. Resolution walks the table in order and
/// the first route whose path equals the normalized location wins.
#[derive(Clone, Debug, Default)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    pub fn new(routes: Vec<Route>) -> Self {
        Self { routes }
    }

    /// The poll site's table. `/results` is registered under the name `reults`,
    /// kept verbatim since links elsewhere may depend on it.
    pub fn poll_site() -> Self {
        Self::new(vec![
            Route::eager("/", "home", views::home()),
            Route::lazy("/about", "about", views::ABOUT_CHUNK),
            Route::lazy("/voters", "voters", views::VOTERS_CHUNK),
            Route::lazy("/teams", "teams", views::TEAMS_CHUNK),
            Route::lazy("/results", "reults", views::RESULTS_CHUNK),
            Route::lazy("/overview", "overview", views::OVERVIEW_CHUNK),
        ])
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn iter(&self) -> impl Iterator<Item = &Route> {
        self.routes.iter()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// First route matching `location`. Query string and fragment are ignored.
    pub fn resolve(&self, location: &str) -> Option<&Route> {
        let path = normalize_path(location);
        self.routes.iter().find(|route| route.path == path)
    }

    pub fn by_name(&self, name: &str) -> Option<&Route> {
        self.routes.iter().find(|route| route.name == name)
    }

    pub fn infos(&self) -> Vec<RouteInfo> {
        self.routes.iter().map(Route::info).collect()
    }

    /// Names registered more than once, in order of first appearance.
    pub fn duplicate_names(&self) -> Vec<&str> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for route in &self.routes {
            *counts.entry(route.name.as_str()).or_insert(0) += 1;
        }

        let mut duplicates: Vec<&str> = Vec::new();
        for route in &self.routes {
            let name = route.name.as_str();
            if counts[name] > 1 && !duplicates.contains(&name) {
                duplicates.push(name);
            }
        }
        duplicates
    }

    /// `(name, path)` pairs whose name differs from the last path segment.
    /// The root route is exempt.
    pub fn suspicious_names(&self) -> Vec<(&str, &str)> {
        self.routes
            .iter()
            .filter(|route| {
                let segment = route.path.rsplit('/').next().unwrap_or("");
                !segment.is_empty() && segment != route.name
            })
            .map(|route| (route.name.as_str(), route.path.as_str()))
            .collect()
    }
}

/// strip_location
///
/// Drops the query string and fragment from a location, leaving the path.
pub fn strip_location(location: &str) -> &str {
    let end = location.find(['?', '#']).unwrap_or(location.len());
    &location[..end]
}

fn is_canonical(path: &str) -> bool {
    path == "/"
        || (path.starts_with('/')
            && !path.ends_with('/')
            && !path.contains("//")
            && !path.contains('\\'))
}

/// normalize_path
///
/// Canonical form used for matching: query and fragment removed, backslashes
/// turned into `/`, empty segments collapsed, no trailing slash. `""` is `/`.
/// Already canonical paths are returned borrowed.
pub fn normalize_path(location: &str) -> Cow<'_, str> {
    let path = strip_location(location);
    if is_canonical(path) {
        return Cow::Borrowed(path);
    }

    let normalized = path
        .replace('\\', "/")
        .split('/')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("/");

    if normalized.is_empty() {
        Cow::Borrowed("/")
    } else {
        Cow::Owned(format!("/{normalized}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_keeps_canonical_paths_borrowed() {
        assert!(matches!(normalize_path("/about"), Cow::Borrowed("/about")));
        assert!(matches!(normalize_path("/"), Cow::Borrowed("/")));
        assert!(matches!(normalize_path("/teams?sort=rank"), Cow::Borrowed("/teams")));
    }

    #[test]
    fn normalize_fixes_sloppy_paths() {
        assert_eq!(normalize_path("/about/"), "/about");
        assert_eq!(normalize_path("//about"), "/about");
        assert_eq!(normalize_path("\\voters"), "/voters");
        assert_eq!(normalize_path("/results/#week-3"), "/results");
        assert_eq!(normalize_path(""), "/");
        assert_eq!(normalize_path("?x=1"), "/");
    }

    #[test]
    fn strip_location_handles_query_before_fragment() {
        assert_eq!(strip_location("/a?b#c"), "/a");
        assert_eq!(strip_location("/a#b?c"), "/a");
        assert_eq!(strip_location("/a"), "/a");
    }

    #[test]
    fn first_match_wins() {
        let table = RouteTable::new(vec![
            Route::lazy("/teams", "teams", "teams"),
            Route::lazy("/teams", "teams-legacy", "legacy"),
        ]);
        assert_eq!(table.resolve("/teams").unwrap().name, "teams");
    }

    #[test]
    fn duplicate_names_are_reported_once() {
        let table = RouteTable::new(vec![
            Route::lazy("/a", "x", "a"),
            Route::lazy("/b", "y", "b"),
            Route::lazy("/c", "x", "c"),
            Route::lazy("/d", "x", "d"),
        ]);
        assert_eq!(table.duplicate_names(), vec!["x"]);
    }

    #[test]
    fn poll_site_flags_misspelled_results_name() {
        let table = RouteTable::poll_site();
        assert!(table.duplicate_names().is_empty());
        assert_eq!(table.suspicious_names(), vec![("reults", "/results")]);
    }
}
