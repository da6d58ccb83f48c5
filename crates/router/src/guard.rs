//! Navigation guard: decides whether a transition may proceed.

use rusyle_auth::{SessionSnapshot, SessionStore};

use crate::route::RouteMeta;

/// Where unauthenticated users are sent.
pub const LOGIN_PATH: &str = "/login";
/// Default area for authenticated users.
pub const LANDING_PATH: &str = "/events";

/// Session facts the guard depends on. Reads must be synchronous and cheap.
pub trait SessionFlags {
    fn is_authenticated(&self) -> bool;
    fn is_admin(&self) -> bool;
}

impl SessionFlags for SessionStore {
    fn is_authenticated(&self) -> bool {
        SessionStore::is_authenticated(self)
    }

    fn is_admin(&self) -> bool {
        SessionStore::is_admin(self)
    }
}

impl SessionFlags for SessionSnapshot {
    fn is_authenticated(&self) -> bool {
        SessionSnapshot::is_authenticated(self)
    }

    fn is_admin(&self) -> bool {
        SessionSnapshot::is_admin(self)
    }
}

impl<T: SessionFlags + ?Sized> SessionFlags for &T {
    fn is_authenticated(&self) -> bool {
        (**self).is_authenticated()
    }

    fn is_admin(&self) -> bool {
        (**self).is_admin()
    }
}

/// Fixed flags, for callers that already know the answer.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct StaticFlags {
    pub authenticated: bool,
    pub admin: bool,
}

impl SessionFlags for StaticFlags {
    fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    fn is_admin(&self) -> bool {
        self.admin
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Navigation {
    Allow,
    Redirect(&'static str),
}

/// Decide a transition to a route with `meta`. First matching rule wins:
///
/// 1. auth required, not authenticated: redirect to login
/// 2. guest required, authenticated: redirect to the landing area
/// 3. admin required, not admin: redirect to the landing area (not login)
/// 4. otherwise allow
pub fn guard(meta: &RouteMeta, session: &impl SessionFlags) -> Navigation {
    if meta.requires_auth && !session.is_authenticated() {
        Navigation::Redirect(LOGIN_PATH)
    } else if meta.requires_guest && session.is_authenticated() {
        Navigation::Redirect(LANDING_PATH)
    } else if meta.requires_admin && !session.is_admin() {
        Navigation::Redirect(LANDING_PATH)
    } else {
        Navigation::Allow
    }
}
