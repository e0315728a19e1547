//! Durable storage for the session credential.
//!
//! The credential is two string entries, a raw bearer token and a
//! JSON-serialized [`Identity`]. [`CredentialStore`] presents them as one
//! unit on top of any [`KeyValueStore`] backend.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use keyring::Entry;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::models::Identity;

/// Keyring service name
const SERVICE_NAME: &str = "orderfood";

const TOKEN_KEY: &str = "token";
const USER_KEY: &str = "user";

/// Minimal string key-value storage.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    /// Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}

/// Which backend holds the credential.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CredentialBackend {
    #[default]
    File,
    Keyring,
}

// ============================================================================
// Backends
// ============================================================================

/// One file per key inside a directory.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path(key);
        if !path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read credential file: {}", key))?;
        Ok(Some(contents))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        std::fs::create_dir_all(&self.dir).context("Failed to create credential directory")?;
        std::fs::write(self.path(key), value)
            .with_context(|| format!("Failed to write credential file: {}", key))?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.path(key);
        if path.exists() {
            std::fs::remove_file(&path)
                .with_context(|| format!("Failed to remove credential file: {}", key))?;
        }
        Ok(())
    }
}

/// Entries in the OS keychain.
pub struct KeyringStore {
    service: String,
}

impl KeyringStore {
    pub fn new() -> Self {
        Self::with_service(SERVICE_NAME)
    }

    /// Entries under a different keychain service name.
    pub fn with_service(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    fn entry(&self, key: &str) -> Result<Entry> {
        Entry::new(&self.service, key).context("Failed to create keyring entry")
    }
}

impl Default for KeyringStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValueStore for KeyringStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match self.entry(key)?.get_password() {
            Ok(value) => Ok(Some(value)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e).context("Failed to retrieve credential from keychain"),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entry(key)?
            .set_password(value)
            .context("Failed to store credential in keychain")
    }

    fn remove(&self, key: &str) -> Result<()> {
        match self.entry(key)?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e).context("Failed to delete credential from keychain"),
        }
    }
}

/// Process-local storage. Nothing survives a restart.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries().remove(key);
        Ok(())
    }
}

// ============================================================================
// Credential store
// ============================================================================

/// The persisted half of a session: token plus the user it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCredential {
    pub token: String,
    pub user: Identity,
}

pub struct CredentialStore {
    backend: Box<dyn KeyValueStore>,
}

impl CredentialStore {
    pub fn new(backend: impl KeyValueStore + 'static) -> Self {
        Self {
            backend: Box::new(backend),
        }
    }

    /// Store backed by the given backend kind, rooted at `data_dir` for files.
    pub fn open(kind: CredentialBackend, data_dir: &Path) -> Self {
        match kind {
            CredentialBackend::File => Self::new(FileStore::new(data_dir.join("credentials"))),
            CredentialBackend::Keyring => Self::new(KeyringStore::new()),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(MemoryStore::new())
    }

    /// Read the stored credential. Returns `None` unless both entries are
    /// present and the user record parses.
    pub fn get(&self) -> Result<Option<StoredCredential>> {
        let token = self.backend.get(TOKEN_KEY)?;
        let user = self.backend.get(USER_KEY)?;

        match (token, user) {
            (Some(token), Some(user)) => {
                let user: Identity = match serde_json::from_str(&user) {
                    Ok(user) => user,
                    Err(e) => {
                        warn!(error = %e, "Stored user record is unreadable, ignoring credential");
                        return Ok(None);
                    }
                };
                Ok(Some(StoredCredential { token, user }))
            }
            (None, None) => Ok(None),
            (token, user) => {
                warn!(
                    has_token = token.is_some(),
                    has_user = user.is_some(),
                    "Partial credential in storage, ignoring"
                );
                Ok(None)
            }
        }
    }

    /// Write token and user together.
    pub fn set(&self, token: &str, user: &Identity) -> Result<()> {
        let user = serde_json::to_string(user).context("Failed to serialize user record")?;
        self.backend.set(TOKEN_KEY, token)?;
        if let Err(e) = self.backend.set(USER_KEY, &user) {
            // Do not leave a token without its user behind
            let _ = self.backend.remove(TOKEN_KEY);
            return Err(e);
        }
        debug!("Credential stored");
        Ok(())
    }

    /// Remove both entries. Clearing an empty store is a no-op.
    pub fn clear(&self) -> Result<()> {
        let token = self.backend.remove(TOKEN_KEY);
        let user = self.backend.remove(USER_KEY);
        token.and(user)
    }
}

/// Backend doubles shared by the auth tests.
#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Arc;

    use super::*;

    /// Accepts the token entry but fails every write of the user record.
    #[derive(Clone, Default)]
    pub(crate) struct RejectUserWrites {
        pub(crate) inner: Arc<MemoryStore>,
    }

    impl KeyValueStore for RejectUserWrites {
        fn get(&self, key: &str) -> Result<Option<String>> {
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> Result<()> {
            if key == USER_KEY {
                anyhow::bail!("disk full");
            }
            self.inner.set(key, value)
        }

        fn remove(&self, key: &str) -> Result<()> {
            self.inner.remove(key)
        }
    }
}
