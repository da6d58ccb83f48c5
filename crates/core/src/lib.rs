//! `rusyle-core`: shared domain types for the Rusyle events client.
//!
//! This crate contains **pure data** (no HTTP, no storage, no async).

pub mod credential;
pub mod entity;
pub mod error;
pub mod event;
pub mod id;
pub mod role;
pub mod user;

pub use credential::Credential;
pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use event::{Event, EventStatus, ReviewDraft};
pub use id::{EventId, UserId};
pub use role::Role;
pub use user::User;
