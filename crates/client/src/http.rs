//! JSON-over-HTTP client with an ambient bearer credential.

use std::sync::{Arc, RwLock};

use reqwest::header::AUTHORIZATION;
use reqwest::{Method, RequestBuilder, Url};
use rusyle_core::Credential;
use serde::Serialize;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::config::ClientConfig;
use crate::error::ApiError;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Process-wide credential slot shared by every clone of an [`ApiClient`].
///
/// Writers are the session layer only; everything else reads. The value is
/// captured when a request is built, so replacing or clearing it never
/// affects requests already in flight.
#[derive(Debug, Clone, Default)]
pub struct AuthContext {
    credential: Arc<RwLock<Option<Credential>>>,
}

impl AuthContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, credential: Credential) {
        let mut slot = self
            .credential
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *slot = Some(credential);
    }

    pub fn clear(&self) {
        let mut slot = self
            .credential
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *slot = None;
    }

    pub fn current(&self) -> Option<Credential> {
        self.credential
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn is_set(&self) -> bool {
        self.credential
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .is_some()
    }
}

/// Client for the Rusyle REST API.
///
/// Cheap to clone; clones share the connection pool and the [`AuthContext`].
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    auth: AuthContext,
}

impl ApiClient {
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        Self::with_auth(config, AuthContext::new())
    }

    pub fn with_auth(config: &ClientConfig, auth: AuthContext) -> Result<Self, ApiError> {
        let mut base_url = Url::parse(config.base_url.trim())
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {}", config.base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(config.base_url.clone()));
        }
        // Url::join treats a path without trailing slash as a file and drops it.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.clone());
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| ApiError::Client(e.to_string()))?;

        Ok(Self {
            http,
            base_url,
            auth,
        })
    }

    pub fn auth(&self) -> &AuthContext {
        &self.auth
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Absolute URL for a path relative to the base (`/events/5` or `events/5`).
    pub fn url(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {}", path, e)))
    }

    pub async fn get<T>(&self, path: &str) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        let req = self.request(Method::GET, path)?;
        self.send(req, Method::GET, path).await
    }

    /// `GET` with query parameters serialized from `query`.
    pub async fn get_with_query<T, Q>(&self, path: &str, query: &Q) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let req = self.request(Method::GET, path)?.query(query);
        self.send(req, Method::GET, path).await
    }

    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let req = self.request(Method::POST, path)?.json(body);
        self.send(req, Method::POST, path).await
    }

    /// `POST` without a request body.
    pub async fn post_empty<T>(&self, path: &str) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        let req = self.request(Method::POST, path)?;
        self.send(req, Method::POST, path).await
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ApiError> {
        let url = self.url(path)?;
        let mut req = self.http.request(method, url);
        if let Some(credential) = self.auth.current() {
            req = req.header(AUTHORIZATION, credential.bearer_header());
        }
        Ok(req)
    }

    async fn send<T>(&self, req: RequestBuilder, method: Method, path: &str) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        let request_id = Uuid::now_v7();
        let req = req.header(REQUEST_ID_HEADER, request_id.to_string());

        tracing::debug!(%method, path, %request_id, "dispatching request");

        let resp = req.send().await.map_err(|e| {
            tracing::warn!(
                %method,
                path,
                %request_id,
                error = %e,
                "request failed without response"
            );
            ApiError::Network(e.to_string())
        })?;

        let status = resp.status();
        let bytes = resp
            .bytes()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        if !status.is_success() {
            let err = ApiError::from_error_body(status.as_u16(), &bytes);
            tracing::warn!(
                %method,
                path,
                %request_id,
                status = status.as_u16(),
                error = %err,
                "request rejected"
            );
            return Err(err);
        }

        tracing::debug!(%method, path, %request_id, status = status.as_u16(), "request succeeded");

        // An empty success body decodes as JSON `null`.
        let raw: &[u8] = if bytes.iter().all(u8::is_ascii_whitespace) {
            b"null"
        } else {
            &bytes[..]
        };
        serde_json::from_slice(raw).map_err(|e| ApiError::Decode {
            status: status.as_u16(),
            reason: e.to_string(),
        })
    }
}
