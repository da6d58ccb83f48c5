//! Static route table and path matching.

use std::collections::BTreeMap;

/// Per-route access requirements, fixed at startup.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct RouteMeta {
    pub requires_auth: bool,
    pub requires_guest: bool,
    pub requires_admin: bool,
}

impl RouteMeta {
    pub const PUBLIC: RouteMeta = RouteMeta {
        requires_auth: false,
        requires_guest: false,
        requires_admin: false,
    };
    pub const GUEST: RouteMeta = RouteMeta {
        requires_auth: false,
        requires_guest: true,
        requires_admin: false,
    };
    pub const AUTH: RouteMeta = RouteMeta {
        requires_auth: true,
        requires_guest: false,
        requires_admin: false,
    };
    pub const ADMIN: RouteMeta = RouteMeta {
        requires_auth: true,
        requires_guest: false,
        requires_admin: true,
    };
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Route {
    pub name: &'static str,
    /// Pattern; `:name` segments capture one path segment.
    pub path: &'static str,
    pub meta: RouteMeta,
}

impl Route {
    pub const fn new(name: &'static str, path: &'static str, meta: RouteMeta) -> Self {
        Self { name, path, meta }
    }
}

const STANDARD_ROUTES: [Route; 9] = [
    Route::new("home", "/", RouteMeta::PUBLIC),
    Route::new("login", "/login", RouteMeta::GUEST),
    Route::new("register", "/register", RouteMeta::GUEST),
    Route::new("verify-email", "/verify-email/:token", RouteMeta::PUBLIC),
    Route::new("forgot-password", "/forgot-password", RouteMeta::GUEST),
    Route::new("reset-password", "/reset-password/:token", RouteMeta::GUEST),
    Route::new("events", "/events", RouteMeta::AUTH),
    Route::new("event-detail", "/events/:id", RouteMeta::AUTH),
    Route::new("admin", "/admin", RouteMeta::ADMIN),
];

/// A concrete path matched against a [`Route`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
    pub route: Route,
    /// Matched path without query string or fragment.
    pub path: String,
    pub params: BTreeMap<String, String>,
}

impl RouteMatch {
    pub fn name(&self) -> &'static str {
        self.route.name
    }

    pub fn meta(&self) -> &RouteMeta {
        &self.route.meta
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    pub fn new(routes: Vec<Route>) -> Self {
        Self { routes }
    }

    /// The application's route table.
    pub fn standard() -> Self {
        Self::new(STANDARD_ROUTES.to_vec())
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn by_name(&self, name: &str) -> Option<&Route> {
        self.routes.iter().find(|r| r.name == name)
    }

    /// Match `path` against the table; first matching route wins.
    ///
    /// Query string and fragment are ignored, as are empty segments (so
    /// `/events/` matches `/events`).
    pub fn resolve(&self, path: &str) -> Option<RouteMatch> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments = split_segments(path);

        self.routes.iter().find_map(|route| {
            match_pattern(route.path, &segments).map(|params| RouteMatch {
                route: *route,
                path: format!("/{}", segments.join("/")),
                params,
            })
        })
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::standard()
    }
}

fn split_segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

fn match_pattern(pattern: &str, segments: &[&str]) -> Option<BTreeMap<String, String>> {
    let pattern = split_segments(pattern);
    if pattern.len() != segments.len() {
        return None;
    }

    let mut params = BTreeMap::new();
    for (expected, actual) in pattern.iter().zip(segments) {
        match expected.strip_prefix(':') {
            Some(name) => {
                params.insert(name.to_string(), (*actual).to_string());
            }
            None if expected == actual => {}
            None => return None,
        }
    }
    Some(params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn resolves_static_routes() {
        let table = RouteTable::standard();
        assert_eq!(table.resolve("/").unwrap().name(), "home");
        assert_eq!(table.resolve("").unwrap().name(), "home");
        assert_eq!(table.resolve("/login").unwrap().name(), "login");
        assert_eq!(table.resolve("/events/").unwrap().name(), "events");
        assert_eq!(table.resolve("/admin?tab=users").unwrap().name(), "admin");
    }

    #[test]
    fn extracts_params() {
        let table = RouteTable::standard();
        let m = table.resolve("/reset-password/abc123#top").unwrap();
        assert_eq!(m.name(), "reset-password");
        assert_eq!(m.param("token"), Some("abc123"));
        assert_eq!(m.path, "/reset-password/abc123");
        assert!(m.meta().requires_guest);
    }

    #[test]
    fn unknown_paths_do_not_resolve() {
        let table = RouteTable::standard();
        assert!(table.resolve("/nope").is_none());
        assert!(table.resolve("/events/5/extra").is_none());
        assert!(table.resolve("/verify-email").is_none());
    }

    #[test]
    fn standard_table_requirements() {
        let table = RouteTable::standard();
        let meta = |name: &str| table.by_name(name).unwrap().meta;

        assert_eq!(meta("home"), RouteMeta::PUBLIC);
        assert_eq!(meta("verify-email"), RouteMeta::PUBLIC);
        for guest in ["login", "register", "forgot-password", "reset-password"] {
            assert_eq!(meta(guest), RouteMeta::GUEST, "{guest}");
        }
        assert_eq!(meta("events"), RouteMeta::AUTH);
        assert_eq!(meta("event-detail"), RouteMeta::AUTH);
        assert_eq!(meta("admin"), RouteMeta::ADMIN);
    }

    proptest! {
        #[test]
        fn any_event_id_resolves_to_detail(id in "[A-Za-z0-9_-]{1,24}") {
            let table = RouteTable::standard();
            let m = table.resolve(&format!("/events/{id}")).unwrap();
            prop_assert_eq!(m.name(), "event-detail");
            prop_assert_eq!(m.param("id"), Some(id.as_str()));
        }
    }
}
