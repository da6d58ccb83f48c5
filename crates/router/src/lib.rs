//! `rusyle-router`: route table and navigation guard.
//!
//! Pure decision logic: no IO, no async. Session state comes in through the
//! [`SessionFlags`] trait, which [`rusyle_auth::SessionStore`] implements.

pub mod guard;
pub mod navigator;
pub mod route;

pub use guard::{LANDING_PATH, LOGIN_PATH, Navigation, SessionFlags, StaticFlags, guard};
pub use navigator::{NavigationOutcome, Navigator};
pub use route::{Route, RouteMatch, RouteMeta, RouteTable};
