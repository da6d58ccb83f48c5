use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Opaque bearer token authorizing requests on behalf of a user.
///
/// Never empty: an empty token is treated as "no credential" everywhere, so
/// the type refuses to represent it. `Debug` output is redacted.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> DomainResult<Self> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(DomainError::validation("credential must not be empty"));
        }
        Ok(Self(token))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Value for an `Authorization` header.
    pub fn bearer_header(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl TryFrom<String> for Credential {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Credential> for String {
    fn from(value: Credential) -> Self {
        value.0
    }
}

impl core::fmt::Debug for Credential {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}
