use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Role identifier attached to a user account.
///
/// Roles are opaque strings on the wire (`"user"`, `"admin"`, and whatever
/// else the server introduces); only `admin` carries meaning client-side.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(Cow<'static, str>);

impl Role {
    pub const USER: Role = Role(Cow::Borrowed("user"));
    pub const ADMIN: Role = Role(Cow::Borrowed("admin"));

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Exact, case-sensitive match against `"admin"`.
    pub fn is_admin(&self) -> bool {
        self.as_str() == Self::ADMIN.as_str()
    }
}

impl Default for Role {
    fn default() -> Self {
        Self::USER
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}
