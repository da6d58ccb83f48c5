//! Tracing/logging setup shared by Rusyle front-ends and tools.

/// Initialize process-wide tracing with the default filter (`info`).
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init(tracing::LogFormat::from_env());
}

/// Tracing configuration (filters, layers).
pub mod tracing;
