//! `rusyle-auth`: client-side session state.
//!
//! Owns the signed-in user and bearer credential, persists them to durable
//! storage, and keeps the API client's ambient credential in sync.

pub mod messages;
pub mod payload;
pub mod persist;
pub mod session;

pub use payload::{AuthPayload, VerifyEmailPayload};
pub use persist::{PersistedSession, RestoreReport, RestoreStatus};
pub use session::{SessionSnapshot, SessionStore};
