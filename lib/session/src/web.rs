//! Browser `localStorage` credential store.
//!
//! Storage is origin-scoped and survives page reloads. The handle is looked
//! up on every call, so the store itself holds nothing but the entry name.

use rootcause::Report;
use tracing::warn;
use web_sys::Storage;

use crate::error::StoreError;
use crate::store::CredentialStore;

/// Credential store backed by `window.localStorage`.
#[derive(Debug, Clone)]
pub struct LocalStorageCredentialStore {
    key: String,
}

impl LocalStorageCredentialStore {
    /// Creates a store for the given entry name.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

fn local_storage() -> Result<Storage, StoreError> {
    let window = web_sys::window().ok_or_else(|| StoreError::Unavailable {
        details: "no window".to_string(),
    })?;

    window
        .local_storage()
        .map_err(|_| StoreError::Unavailable {
            details: "localStorage access denied".to_string(),
        })?
        .ok_or_else(|| StoreError::Unavailable {
            details: "localStorage disabled".to_string(),
        })
}

impl CredentialStore for LocalStorageCredentialStore {
    fn get(&self) -> Option<String> {
        let storage = match local_storage() {
            Ok(storage) => storage,
            Err(e) => {
                warn!(error = %e, "failed to open localStorage");
                return None;
            }
        };
        match storage.get_item(&self.key) {
            Ok(token) => token,
            Err(_) => {
                warn!(key = %self.key, "localStorage rejected the read");
                None
            }
        }
    }

    fn set(&self, token: &str) -> Result<(), Report<StoreError>> {
        local_storage()?
            .set_item(&self.key, token)
            .map_err(|_| StoreError::Unavailable {
                details: "localStorage rejected the write".to_string(),
            })?;
        Ok(())
    }

    fn clear(&self) -> Result<(), Report<StoreError>> {
        local_storage()?
            .remove_item(&self.key)
            .map_err(|_| StoreError::Unavailable {
                details: "localStorage rejected the removal".to_string(),
            })?;
        Ok(())
    }
}
