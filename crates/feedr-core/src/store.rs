//! Persistent key-value storage for session state.
//!
//! Values are kept in `${FEEDR_HOME}/state.json` as a single JSON object with
//! restricted permissions (0600). The file is re-read on every access so that
//! a write is immediately visible to the next read, and a stored credential
//! is never logged or displayed in full.
//!
//! Failure semantics: a missing, unreadable, or corrupt entry degrades to
//! "value absent"; write failures are logged and swallowed. Callers must
//! treat any read miss as "use default" rather than an error.

use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;

use crate::api::CredentialSource;
use crate::config::paths;

/// Well-known keys in the session state file.
pub mod keys {
    /// JSON-encoded bearer token string.
    pub const TOKEN: &str = "token";
    /// JSON-encoded User object cached from the last successful login.
    pub const USER: &str = "user";
}

/// File-backed key-value store for small JSON-serializable values.
#[derive(Debug, Clone)]
pub struct KvStore {
    path: PathBuf,
}

impl KvStore {
    /// Opens the store at the default state path.
    pub fn open() -> Self {
        Self::at(paths::state_path())
    }

    /// Opens the store at a specific path.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the value stored under `key`.
    ///
    /// Any failure (missing file, corrupt JSON, undecodable value) yields
    /// `None`.
    pub fn get<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.read_map().remove(key)?;
        match serde_json::from_value(value) {
            Ok(decoded) => Some(decoded),
            Err(err) => {
                tracing::warn!(key, %err, "stored value is not decodable, treating as absent");
                None
            }
        }
    }

    /// Reads the value stored under `key`, falling back to `default`.
    pub fn get_or<T: serde::de::DeserializeOwned>(&self, key: &str, default: T) -> T {
        self.get(key).unwrap_or(default)
    }

    /// Stores `value` under `key`.
    ///
    /// Storage and serialization failures are logged and swallowed; they are
    /// indistinguishable from a later read miss.
    pub fn set<T: Serialize>(&self, key: &str, value: &T) {
        let encoded = match serde_json::to_value(value) {
            Ok(encoded) => encoded,
            Err(err) => {
                tracing::warn!(key, %err, "failed to serialize value, skipping write");
                return;
            }
        };

        let mut map = self.read_map();
        map.insert(key.to_string(), encoded);
        self.write_map(&map);
    }

    /// Removes the value stored under `key`, if any.
    pub fn remove(&self, key: &str) {
        let mut map = self.read_map();
        if map.remove(key).is_some() {
            self.write_map(&map);
        }
    }

    fn read_map(&self) -> BTreeMap<String, Value> {
        if !self.path.exists() {
            return BTreeMap::new();
        }

        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) => {
                tracing::warn!(path = %self.path.display(), %err, "failed to read state file");
                return BTreeMap::new();
            }
        };

        match serde_json::from_str(&contents) {
            Ok(map) => map,
            Err(err) => {
                tracing::warn!(path = %self.path.display(), %err, "state file is corrupt, treating as empty");
                BTreeMap::new()
            }
        }
    }

    fn write_map(&self, map: &BTreeMap<String, Value>) {
        if let Err(err) = self.try_write_map(map) {
            tracing::warn!(path = %self.path.display(), %err, "failed to write state file");
        }
    }

    fn try_write_map(&self, map: &BTreeMap<String, Value>) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_string_pretty(map)?;

        // Write with restricted permissions
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            let mut file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .mode(0o600)
                .open(&self.path)?;
            file.write_all(contents.as_bytes())?;
        }

        #[cfg(not(unix))]
        {
            fs::write(&self.path, contents)?;
        }

        Ok(())
    }
}

impl CredentialSource for KvStore {
    fn current(&self) -> Option<String> {
        self.get::<String>(keys::TOKEN)
    }
}
