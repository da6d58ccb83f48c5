//! Session store: who is signed in, and with which credential.

use std::future::Future;
use std::sync::{Arc, RwLock};

use rusyle_client::{ApiClient, ApiError, Storage};
use rusyle_core::{Credential, User};
use serde_json::Value;

use crate::messages;
use crate::payload::{
    AuthPayload, EmailRequest, LoginRequest, RegisterRequest, ResetPasswordRequest, TokenRequest,
    VerifyEmailPayload,
};
use crate::persist::{PersistedSession, RestoreReport};

/// Point-in-time copy of the session state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub user: Option<User>,
    pub credential: Option<Credential>,
    pub loading: bool,
    pub last_error: Option<String>,
}

impl SessionSnapshot {
    pub fn is_authenticated(&self) -> bool {
        self.credential.is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.user.as_ref().is_some_and(User::is_admin)
    }
}

/// Client-side session store.
///
/// Cheap to clone; clones share state. State is only locked for the duration
/// of a single read or assignment, never across a network call, so the
/// derived flags are always readable synchronously.
#[derive(Debug, Clone)]
pub struct SessionStore {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    api: ApiClient,
    storage: Arc<dyn Storage>,
    state: RwLock<SessionSnapshot>,
}

impl SessionStore {
    /// Restore the session from `storage`, ignoring what was found.
    pub fn new(api: ApiClient, storage: Arc<dyn Storage>) -> Self {
        Self::restore(api, storage).0
    }

    /// Restore the session from `storage`.
    ///
    /// Missing or malformed entries leave the corresponding field empty. A
    /// restored credential becomes the client's ambient bearer credential.
    pub fn restore(api: ApiClient, storage: Arc<dyn Storage>) -> (Self, RestoreReport) {
        let persisted = PersistedSession::load(storage.as_ref());
        let report = persisted.report();
        if report.has_malformed() {
            tracing::warn!(?report, "ignoring malformed persisted session entries");
        }

        let user = persisted.user.into_option();
        let credential = persisted.credential.into_option();
        match &credential {
            Some(credential) => api.auth().set(credential.clone()),
            None => api.auth().clear(),
        }
        tracing::info!(
            authenticated = credential.is_some(),
            user_id = user.as_ref().map(|u| u.id.get()),
            "session restored"
        );

        let store = Self {
            inner: Arc::new(Inner {
                api,
                storage,
                state: RwLock::new(SessionSnapshot {
                    user,
                    credential,
                    loading: false,
                    last_error: None,
                }),
            }),
        };
        (store, report)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.read(|s| s.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.read(SessionSnapshot::is_authenticated)
    }

    pub fn is_admin(&self) -> bool {
        self.read(SessionSnapshot::is_admin)
    }

    pub fn user(&self) -> Option<User> {
        self.read(|s| s.user.clone())
    }

    pub fn credential(&self) -> Option<Credential> {
        self.read(|s| s.credential.clone())
    }

    pub fn loading(&self) -> bool {
        self.read(|s| s.loading)
    }

    pub fn last_error(&self) -> Option<String> {
        self.read(|s| s.last_error.clone())
    }

    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    /// `POST /auth/login`; establishes the session on success.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthPayload, ApiError> {
        let request = LoginRequest { email, password };
        self.track(
            "login",
            messages::LOGIN_FAILED,
            self.inner.api.post::<AuthPayload, _>("/auth/login", &request),
            |payload: &AuthPayload| self.establish(&payload.user, &payload.access_token),
        )
        .await
    }

    /// `POST /auth/register`. Registration alone never signs the user in.
    pub async fn register(
        &self,
        full_name: &str,
        email: &str,
        password: &str,
    ) -> Result<Value, ApiError> {
        let request = RegisterRequest {
            full_name,
            email,
            password,
        };
        self.track(
            "register",
            messages::REGISTER_FAILED,
            self.inner.api.post::<Value, _>("/auth/register", &request),
            |_| {},
        )
        .await
    }

    /// `POST /auth/verify-email`; establishes the session only if the
    /// response carries both a user and an access token.
    pub async fn verify_email(&self, token: &str) -> Result<VerifyEmailPayload, ApiError> {
        let request = TokenRequest { token };
        self.track(
            "verify_email",
            messages::VERIFY_EMAIL_FAILED,
            self.inner
                .api
                .post::<VerifyEmailPayload, _>("/auth/verify-email", &request),
            |payload: &VerifyEmailPayload| {
                if let Some((user, credential)) = payload.session() {
                    self.establish(&user, &credential);
                }
            },
        )
        .await
    }

    /// `POST /auth/logout`, best effort. The local session is cleared
    /// whatever the server says, and remote failures are not reported.
    pub async fn logout(&self) {
        match self.inner.api.post_empty::<Value>("/auth/logout").await {
            Ok(_) => {}
            Err(err) if err.is_network() => {
                tracing::debug!(error = %err, "server unreachable; clearing local session only");
            }
            Err(err) => {
                tracing::debug!(
                    error = %err,
                    "remote logout failed; clearing local session anyway"
                );
            }
        }
        self.clear();
    }

    pub async fn forgot_password(&self, email: &str) -> Result<Value, ApiError> {
        let request = EmailRequest { email };
        self.track(
            "forgot_password",
            messages::FORGOT_PASSWORD_FAILED,
            self.inner
                .api
                .post::<Value, _>("/auth/forgot-password", &request),
            |_| {},
        )
        .await
    }

    pub async fn reset_password(&self, token: &str, password: &str) -> Result<Value, ApiError> {
        let request = ResetPasswordRequest { token, password };
        self.track(
            "reset_password",
            messages::RESET_PASSWORD_FAILED,
            self.inner
                .api
                .post::<Value, _>("/auth/reset-password", &request),
            |_| {},
        )
        .await
    }

    /// `GET /auth/me`; replaces the stored user. No-op without a credential.
    pub async fn refresh_user(&self) -> Result<Option<User>, ApiError> {
        if !self.is_authenticated() {
            return Ok(None);
        }
        self.track(
            "refresh_user",
            messages::REFRESH_USER_FAILED,
            self.inner.api.get::<User>("/auth/me"),
            |user: &User| {
                self.write(|s| s.user = Some(user.clone()));
                if let Err(err) = PersistedSession::save_user(self.inner.storage.as_ref(), user) {
                    tracing::error!("failed to persist refreshed user: {err:#}");
                }
            },
        )
        .await
        .map(Some)
    }

    /// Drop the session locally: state, storage entries and ambient credential.
    pub fn clear(&self) {
        self.write(|s| {
            s.user = None;
            s.credential = None;
        });
        if let Err(err) = PersistedSession::erase(self.inner.storage.as_ref()) {
            tracing::error!("failed to erase persisted session: {err:#}");
        }
        self.inner.api.auth().clear();
        tracing::info!("session cleared");
    }

    fn establish(&self, user: &User, credential: &Credential) {
        self.write(|s| {
            s.user = Some(user.clone());
            s.credential = Some(credential.clone());
        });
        if let Err(err) = PersistedSession::save(self.inner.storage.as_ref(), user, credential) {
            tracing::error!("failed to persist session: {err:#}");
        }
        self.inner.api.auth().set(credential.clone());
        tracing::info!(user_id = user.id.get(), admin = user.is_admin(), "session established");
    }

    /// Shared shape of every tracked operation: flag `loading`, clear the
    /// previous error, run the call, apply `on_ok` or record a display
    /// message, then lower `loading`. The original error is always returned.
    async fn track<T, F>(
        &self,
        op: &'static str,
        fallback: &'static str,
        call: F,
        on_ok: impl FnOnce(&T),
    ) -> Result<T, ApiError>
    where
        F: Future<Output = Result<T, ApiError>>,
    {
        self.write(|s| {
            s.loading = true;
            s.last_error = None;
        });

        let result = call.await;

        match &result {
            Ok(value) => on_ok(value),
            Err(err) => {
                tracing::warn!(op, error = %err, "session operation failed");
                let message = err.message_or(fallback);
                self.write(|s| s.last_error = Some(message));
            }
        }
        self.write(|s| s.loading = false);

        result
    }

    fn read<R>(&self, f: impl FnOnce(&SessionSnapshot) -> R) -> R {
        let state = self
            .inner
            .state
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&state)
    }

    fn write(&self, f: impl FnOnce(&mut SessionSnapshot)) {
        let mut state = self
            .inner
            .state
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut state);
    }
}
