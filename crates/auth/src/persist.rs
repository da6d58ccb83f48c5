//! Durable copy of the session (`user` and `token` storage entries).

use anyhow::Context;
use rusyle_client::{Restored, Storage, read_json, read_raw};
use rusyle_core::{Credential, User};

pub const USER_KEY: &str = "user";
pub const TOKEN_KEY: &str = "token";

/// Session as found in storage at startup.
///
/// The two entries are read independently: a malformed `user` does not
/// discard a valid `token`, and vice versa.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedSession {
    pub user: Restored<User>,
    pub credential: Restored<Credential>,
}

impl PersistedSession {
    pub fn load(storage: &dyn Storage) -> Self {
        let user = read_json::<User>(storage, USER_KEY);
        let credential = match read_raw(storage, TOKEN_KEY) {
            Restored::Present(raw) => match Credential::new(raw) {
                Ok(credential) => Restored::Present(credential),
                Err(err) => Restored::Malformed(err.to_string()),
            },
            Restored::Absent => Restored::Absent,
            Restored::Malformed(reason) => Restored::Malformed(reason),
        };
        Self { user, credential }
    }

    pub fn report(&self) -> RestoreReport {
        RestoreReport {
            user: RestoreStatus::of(&self.user),
            credential: RestoreStatus::of(&self.credential),
        }
    }

    pub fn save(storage: &dyn Storage, user: &User, credential: &Credential) -> anyhow::Result<()> {
        Self::save_user(storage, user)?;
        storage
            .set(TOKEN_KEY, credential.expose())
            .context("failed to persist credential")?;
        Ok(())
    }

    pub fn save_user(storage: &dyn Storage, user: &User) -> anyhow::Result<()> {
        let json = serde_json::to_string(user).context("failed to serialize user")?;
        storage.set(USER_KEY, &json).context("failed to persist user")?;
        Ok(())
    }

    /// Remove both entries. Attempts both even if the first removal fails.
    pub fn erase(storage: &dyn Storage) -> anyhow::Result<()> {
        let user = storage.remove(USER_KEY).context("failed to remove persisted user");
        let token = storage
            .remove(TOKEN_KEY)
            .context("failed to remove persisted credential");
        user.and(token)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestoreStatus {
    Restored,
    Absent,
    Malformed(String),
}

impl RestoreStatus {
    fn of<T>(restored: &Restored<T>) -> Self {
        match restored {
            Restored::Present(_) => RestoreStatus::Restored,
            Restored::Absent => RestoreStatus::Absent,
            Restored::Malformed(reason) => RestoreStatus::Malformed(reason.clone()),
        }
    }
}

/// What startup restoration found, per storage entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestoreReport {
    pub user: RestoreStatus,
    pub credential: RestoreStatus,
}

impl RestoreReport {
    pub fn has_malformed(&self) -> bool {
        matches!(self.user, RestoreStatus::Malformed(_))
            || matches!(self.credential, RestoreStatus::Malformed(_))
    }
}
