//! `rusyle-catalog`: the events list and the currently viewed event.

pub mod messages;
pub mod query;
pub mod store;

pub use query::EventQuery;
pub use store::{CatalogSnapshot, CatalogStore};
