//! Durable key/value storage for client-side state.
//!
//! Semantics follow browser local storage: string keys, string values,
//! last write wins. `FileStorage` keeps one file per key under an app data
//! directory; `MemoryStorage` is for tests and ephemeral sessions.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use anyhow::{Context, bail};
use serde::de::DeserializeOwned;

pub trait Storage: Send + Sync + core::fmt::Debug {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> anyhow::Result<()>;
    fn remove(&self, key: &str) -> anyhow::Result<()>;
}

/// Outcome of reading one persisted entry at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Restored<T> {
    Present(T),
    Absent,
    /// The entry exists but could not be read or decoded.
    Malformed(String),
}

impl<T> Restored<T> {
    /// Collapse to an `Option`; malformed entries count as absent.
    pub fn into_option(self) -> Option<T> {
        match self {
            Restored::Present(value) => Some(value),
            Restored::Absent | Restored::Malformed(_) => None,
        }
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, Restored::Malformed(_))
    }
}

/// Read a raw string entry. Empty values count as absent.
pub fn read_raw(storage: &dyn Storage, key: &str) -> Restored<String> {
    match storage.get(key) {
        Ok(Some(value)) if !value.is_empty() => Restored::Present(value),
        Ok(_) => Restored::Absent,
        Err(err) => Restored::Malformed(format!("{err:#}")),
    }
}

/// Read and decode a JSON entry. A stored JSON `null` counts as absent.
pub fn read_json<T>(storage: &dyn Storage, key: &str) -> Restored<T>
where
    T: DeserializeOwned,
{
    match read_raw(storage, key) {
        Restored::Present(raw) => match serde_json::from_str::<Option<T>>(&raw) {
            Ok(Some(value)) => Restored::Present(value),
            Ok(None) => Restored::Absent,
            Err(err) => Restored::Malformed(format!("{key}: {err}")),
        },
        Restored::Absent => Restored::Absent,
        Restored::Malformed(reason) => Restored::Malformed(reason),
    }
}

#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        let entries = self
            .entries
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
        let mut entries = self
            .entries
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> anyhow::Result<()> {
        let mut entries = self
            .entries
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        entries.remove(key);
        Ok(())
    }
}

/// Directory-backed storage: each key is a file named after the key.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Open (creating if needed) storage rooted at `dir`.
    pub fn open(dir: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("failed to create storage directory at {:?}", dir))?;
        Ok(Self { dir })
    }

    /// Open storage under the OS app data directory (`<data_dir>/rusyle`).
    pub fn open_default() -> anyhow::Result<Self> {
        Self::open(default_storage_dir()?)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn entry_path(&self, key: &str) -> anyhow::Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            bail!("invalid storage key {key:?}");
        }
        Ok(self.dir.join(key))
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        let path = self.entry_path(key)?;
        match std::fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err).with_context(|| format!("failed to read {:?}", path)),
        }
    }

    fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
        let path = self.entry_path(key)?;
        // Write-then-rename so a crash never leaves a half-written entry.
        let tmp = self.dir.join(format!(".{key}.tmp"));
        std::fs::write(&tmp, value).with_context(|| format!("failed to write {:?}", tmp))?;
        std::fs::rename(&tmp, &path)
            .with_context(|| format!("failed to move {:?} into place", path))?;
        Ok(())
    }

    fn remove(&self, key: &str) -> anyhow::Result<()> {
        let path = self.entry_path(key)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err).with_context(|| format!("failed to remove {:?}", path)),
        }
    }
}

fn default_storage_dir() -> anyhow::Result<PathBuf> {
    let base = dirs::data_dir()
        .or_else(|| {
            dirs::home_dir().map(|mut h| {
                h.push(".local");
                h.push("share");
                h
            })
        })
        .context("failed to resolve OS app data directory (data_dir, ~/.local/share)")?;

    Ok(base.join("rusyle"))
}
