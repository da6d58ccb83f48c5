//! Client configuration (API location, timeouts).

use std::time::Duration;

pub const API_URL_ENV: &str = "RUSYLE_API_URL";
pub const TIMEOUT_ENV: &str = "RUSYLE_HTTP_TIMEOUT_SECS";

pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Prefix applied to every relative request path (e.g. `https://host/api`).
    pub base_url: String,
    /// Per-request deadline. `None` lets every request run to completion.
    pub timeout: Option<Duration>,
    pub user_agent: String,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: None,
            user_agent: format!("rusyle-client/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Read configuration from `RUSYLE_API_URL` / `RUSYLE_HTTP_TIMEOUT_SECS`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ClientConfig::from_env`], with an injectable variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let base_url = lookup(API_URL_ENV)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let timeout = lookup(TIMEOUT_ENV).and_then(|raw| match raw.trim().parse::<u64>() {
            Ok(secs) if secs > 0 => Some(Duration::from_secs(secs)),
            _ => {
                tracing::warn!(value = %raw, "invalid {TIMEOUT_ENV}, requests will not time out");
                None
            }
        });

        Self {
            timeout,
            ..Self::new(base_url)
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}
