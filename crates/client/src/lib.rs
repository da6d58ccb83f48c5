//! `rusyle-client`
//!
//! **Responsibility:** transport and durable local state for the Rusyle client.
//!
//! This crate provides:
//! - `ApiClient`: base-path-prefixed JSON requests with an ambient bearer credential
//! - `AuthContext`: the shared credential slot the client reads on every request
//! - `Storage`: key/value durable storage (`FileStorage`, `MemoryStorage`)
//!
//! Stores in the other crates are thin layers over these pieces.

pub mod config;
pub mod error;
pub mod http;
pub mod storage;

pub use config::ClientConfig;
pub use error::ApiError;
pub use http::{ApiClient, AuthContext};
pub use storage::{FileStorage, MemoryStorage, Restored, Storage, read_json, read_raw};
