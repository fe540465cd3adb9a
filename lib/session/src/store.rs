//! Persistent storage for the active credential.
//!
//! Exactly one credential is stored at a time. Absence of a stored value is
//! the only signal of "logged out" when the client starts.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use rootcause::Report;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::StoreError;

/// Storage for the single active credential.
///
/// `get` and `set` must each be atomic with respect to other callers.
pub trait CredentialStore: Send + Sync {
    /// Returns the stored credential, if any.
    fn get(&self) -> Option<String>;

    /// Replaces the stored credential. No validation is performed.
    fn set(&self, token: &str) -> Result<(), Report<StoreError>>;

    /// Removes the stored credential. Clearing an empty store succeeds.
    fn clear(&self) -> Result<(), Report<StoreError>>;
}

/// Read-only view of a credential store.
///
/// Handed to components that attach the credential but must never change it.
#[derive(Clone)]
pub struct CredentialReader {
    store: Arc<dyn CredentialStore>,
}

impl CredentialReader {
    /// Wraps a shared store.
    #[must_use]
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self { store }
    }

    /// Returns the stored credential, if any.
    #[must_use]
    pub fn get(&self) -> Option<String> {
        self.store.get()
    }
}

impl std::fmt::Debug for CredentialReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialReader")
            .field("present", &self.store.get().is_some())
            .finish()
    }
}

/// In-process store; lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    slot: Mutex<Option<String>>,
}

impl MemoryCredentialStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store already holding a credential.
    #[must_use]
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            slot: Mutex::new(Some(token.into())),
        }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn get(&self) -> Option<String> {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set(&self, token: &str) -> Result<(), Report<StoreError>> {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), Report<StoreError>> {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        Ok(())
    }
}

/// Store backed by a JSON object file of named entries.
///
/// The credential lives under one key; other keys in the file are kept.
/// Survives process restarts the way browser storage survives page reloads.
#[derive(Debug)]
pub struct FileCredentialStore {
    path: PathBuf,
    key: String,
    lock: Mutex<()>,
}

impl FileCredentialStore {
    /// Creates a store for `key` inside the file at `path`.
    ///
    /// The file and its parent directories are created on first write.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, key: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            key: key.into(),
            lock: Mutex::new(()),
        }
    }

    /// Returns the backing file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, err: &std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.display().to_string(),
            details: err.to_string(),
        }
    }

    fn read_entries(&self) -> Result<BTreeMap<String, Value>, StoreError> {
        let raw = match fs::read(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(self.io_error(&e)),
        };

        match serde_json::from_slice(&raw) {
            Ok(entries) => Ok(entries),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "credential file is unreadable, starting empty");
                Ok(BTreeMap::new())
            }
        }
    }

    fn write_entries(&self, entries: &BTreeMap<String, Value>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_error(&e))?;
        }

        let bytes = serde_json::to_vec_pretty(entries).map_err(|e| StoreError::Io {
            path: self.path.display().to_string(),
            details: e.to_string(),
        })?;

        let staging = self.path.with_extension("tmp");
        fs::write(&staging, bytes).map_err(|e| self.io_error(&e))?;
        fs::rename(&staging, &self.path).map_err(|e| self.io_error(&e))?;
        Ok(())
    }
}

impl CredentialStore for FileCredentialStore {
    fn get(&self) -> Option<String> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        match self.read_entries() {
            Ok(entries) => entries
                .get(&self.key)
                .and_then(Value::as_str)
                .map(str::to_string),
            Err(e) => {
                warn!(error = %e, "failed to read credential file");
                None
            }
        }
    }

    fn set(&self, token: &str) -> Result<(), Report<StoreError>> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut entries = self.read_entries()?;
        entries.insert(self.key.clone(), Value::String(token.to_string()));
        self.write_entries(&entries)?;
        debug!(path = %self.path.display(), "credential stored");
        Ok(())
    }

    fn clear(&self) -> Result<(), Report<StoreError>> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut entries = self.read_entries()?;
        if entries.remove(&self.key).is_none() {
            return Ok(());
        }
        self.write_entries(&entries)?;
        debug!(path = %self.path.display(), "credential cleared");
        Ok(())
    }
}
