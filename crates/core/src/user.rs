use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::entity::Entity;
use crate::id::UserId;
use crate::role::Role;

/// Authenticated account as returned by the auth endpoints.
///
/// Only `id` is mandatory; the remaining fields default when the server
/// omits them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "crate::event::lenient_timestamp::deserialize"
    )]
    pub created_at: Option<NaiveDateTime>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

impl Entity for User {
    type Id = UserId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_minimal_payload() {
        let user: User = serde_json::from_value(json!({"id": 1, "role": "user"})).unwrap();
        assert_eq!(user.id, UserId::new(1));
        assert!(!user.is_admin());
        assert!(user.full_name.is_empty());
        assert!(user.created_at.is_none());
    }

    #[test]
    fn decodes_full_payload() {
        let user: User = serde_json::from_value(json!({
            "id": 3,
            "full_name": "Anna Petrova",
            "email": "anna@example.com",
            "role": "admin",
            "theme": "dark",
            "created_at": "2024-05-01T12:30:00.123456"
        }))
        .unwrap();
        assert!(user.is_admin());
        assert_eq!(user.theme.as_deref(), Some("dark"));
        assert!(user.created_at.is_some());
    }
}
