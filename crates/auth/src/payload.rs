//! Request and response bodies of the `/auth/*` endpoints.

use rusyle_core::{Credential, User};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Response of a session-producing call (`/auth/login`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthPayload {
    pub user: User,
    pub access_token: Credential,
    /// Any other fields the server sends along.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Response of `/auth/verify-email`.
///
/// Some deployments sign the user in on verification, others only confirm
/// the address; a session exists only when both fields are present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerifyEmailPayload {
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl VerifyEmailPayload {
    pub fn session(&self) -> Option<(User, Credential)> {
        let user = self.user.clone()?;
        let credential = Credential::new(self.access_token.clone()?).ok()?;
        Some((user, credential))
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct RegisterRequest<'a> {
    pub full_name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct TokenRequest<'a> {
    pub token: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct EmailRequest<'a> {
    pub email: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct ResetPasswordRequest<'a> {
    pub token: &'a str,
    pub password: &'a str,
}
