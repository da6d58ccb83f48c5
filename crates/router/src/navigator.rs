//! Guarded navigation over a [`RouteTable`].

use crate::guard::{Navigation, SessionFlags, guard};
use crate::route::{RouteMatch, RouteTable};

/// Redirects followed per navigation before giving up.
const MAX_REDIRECTS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationOutcome {
    /// The requested route was entered as-is.
    Allowed(RouteMatch),
    /// The guard sent the user elsewhere; `to` is where they ended up.
    Redirected { from: String, to: RouteMatch },
    /// No route matches the path (or a redirect target).
    NotFound(String),
    /// Redirects did not settle within the limit.
    TooManyRedirects(String),
}

impl NavigationOutcome {
    /// The route that is now current, if navigation went anywhere.
    pub fn destination(&self) -> Option<&RouteMatch> {
        match self {
            NavigationOutcome::Allowed(m) | NavigationOutcome::Redirected { to: m, .. } => Some(m),
            NavigationOutcome::NotFound(_) | NavigationOutcome::TooManyRedirects(_) => None,
        }
    }
}

/// Tracks the current location and runs the guard on every transition.
///
/// Holds no session state of its own; flags are read from `session` at the
/// moment of each navigation.
#[derive(Debug)]
pub struct Navigator<S> {
    table: RouteTable,
    session: S,
    current: Option<RouteMatch>,
}

impl<S: SessionFlags> Navigator<S> {
    pub fn new(table: RouteTable, session: S) -> Self {
        Self {
            table,
            session,
            current: None,
        }
    }

    pub fn current(&self) -> Option<&RouteMatch> {
        self.current.as_ref()
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    pub fn session(&self) -> &S {
        &self.session
    }

    /// Attempt to navigate to `path`. The current location changes only when
    /// the outcome has a destination.
    pub fn navigate(&mut self, path: &str) -> NavigationOutcome {
        let outcome = self.decide(path);
        if let Some(destination) = outcome.destination() {
            self.current = Some(destination.clone());
        }
        outcome
    }

    /// Run the guard without moving.
    pub fn decide(&self, path: &str) -> NavigationOutcome {
        let mut target = path.to_string();

        for hop in 0..=MAX_REDIRECTS {
            let Some(matched) = self.table.resolve(&target) else {
                tracing::debug!(path = %target, "no route matches");
                return NavigationOutcome::NotFound(target);
            };

            match guard(matched.meta(), &self.session) {
                Navigation::Allow if hop == 0 => {
                    tracing::debug!(route = matched.name(), "navigation allowed");
                    return NavigationOutcome::Allowed(matched);
                }
                Navigation::Allow => {
                    tracing::debug!(from = path, to = matched.name(), "navigation redirected");
                    return NavigationOutcome::Redirected {
                        from: path.to_string(),
                        to: matched,
                    };
                }
                Navigation::Redirect(next) => {
                    tracing::debug!(route = matched.name(), redirect = next, "guard redirect");
                    target = next.to_string();
                }
            }
        }

        tracing::warn!(path, "navigation exceeded redirect limit");
        NavigationOutcome::TooManyRedirects(path.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guard::StaticFlags;
    use crate::route::{Route, RouteMeta};

    fn navigator(authenticated: bool, admin: bool) -> Navigator<StaticFlags> {
        Navigator::new(
            RouteTable::standard(),
            StaticFlags {
                authenticated,
                admin,
            },
        )
    }

    #[test]
    fn anonymous_user_is_sent_to_login() {
        let mut nav = navigator(false, false);
        let outcome = nav.navigate("/events/5");
        match &outcome {
            NavigationOutcome::Redirected { from, to } => {
                assert_eq!(from, "/events/5");
                assert_eq!(to.name(), "login");
            }
            other => panic!("Expected redirect, got {other:?}"),
        }
        assert_eq!(nav.current().unwrap().name(), "login");
    }

    #[test]
    fn member_is_kept_out_of_guest_and_admin_pages() {
        let mut nav = navigator(true, false);
        for path in ["/login", "/register", "/forgot-password", "/reset-password/x", "/admin"] {
            let outcome = nav.navigate(path);
            assert_eq!(outcome.destination().unwrap().name(), "events", "{path}");
            assert!(matches!(outcome, NavigationOutcome::Redirected { .. }));
        }
    }

    #[test]
    fn admin_reaches_admin_page() {
        let mut nav = navigator(true, true);
        let outcome = nav.navigate("/admin");
        assert!(matches!(outcome, NavigationOutcome::Allowed(ref m) if m.name() == "admin"));
    }

    #[test]
    fn public_pages_are_open_to_everyone() {
        for (authenticated, admin) in [(false, false), (true, false), (true, true)] {
            let mut nav = navigator(authenticated, admin);
            assert!(matches!(nav.navigate("/"), NavigationOutcome::Allowed(_)));
            let outcome = nav.navigate("/verify-email/abc");
            let NavigationOutcome::Allowed(m) = outcome else {
                panic!("Expected verify-email to be allowed");
            };
            assert_eq!(m.param("token"), Some("abc"));
        }
    }

    #[test]
    fn unknown_path_keeps_current_location() {
        let mut nav = navigator(true, false);
        nav.navigate("/events");
        assert_eq!(
            nav.navigate("/missing"),
            NavigationOutcome::NotFound("/missing".to_string())
        );
        assert_eq!(nav.current().unwrap().name(), "events");
    }

    #[test]
    fn redirect_cycles_are_cut_off() {
        // A table where the login page itself requires auth loops forever.
        let table = RouteTable::new(vec![
            Route::new("login", "/login", RouteMeta::AUTH),
            Route::new("events", "/events", RouteMeta::AUTH),
        ]);
        let mut nav = Navigator::new(table, StaticFlags::default());
        assert_eq!(
            nav.navigate("/events"),
            NavigationOutcome::TooManyRedirects("/events".to_string())
        );
        assert!(nav.current().is_none());
    }
}
