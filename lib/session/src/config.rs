//! Client configuration for reaching the contest backend.

use serde::{Deserialize, Serialize};

/// Configuration for talking to the contest backend.
///
/// Fields with defaults can be omitted when loading from a config source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Backend origin, e.g. "http://127.0.0.1:5000".
    base_url: String,
    /// Path of the login endpoint.
    /// Default: "/login"
    #[serde(default = "default_login_path")]
    login_path: String,
    /// Name of the storage entry holding the credential.
    /// Default: "token"
    #[serde(default = "default_storage_key")]
    storage_key: String,
    /// Whether a 401 from an authenticated call ends the local session.
    /// Default: false
    #[serde(default)]
    logout_on_unauthorized: bool,
    /// Whether request bodies get `Content-Type: application/json` when the
    /// caller sets no content type.
    /// Default: true
    #[serde(default = "default_content_type_json")]
    content_type_json: bool,
}

fn default_login_path() -> String {
    "/login".to_string()
}

fn default_storage_key() -> String {
    "token".to_string()
}

fn default_content_type_json() -> bool {
    true
}

impl ClientConfig {
    /// Creates a configuration with defaults for optional fields.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            login_path: default_login_path(),
            storage_key: default_storage_key(),
            logout_on_unauthorized: false,
            content_type_json: default_content_type_json(),
        }
    }

    /// Creates a configuration builder for more customization.
    #[must_use]
    pub fn builder(base_url: impl Into<String>) -> ClientConfigBuilder {
        ClientConfigBuilder::new(base_url)
    }

    /// Returns the backend origin.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the login endpoint path.
    #[must_use]
    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    /// Returns the storage entry name for the credential.
    #[must_use]
    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    /// Returns whether a 401 ends the local session.
    #[must_use]
    pub fn logout_on_unauthorized(&self) -> bool {
        self.logout_on_unauthorized
    }

    /// Returns whether JSON bodies get a default content type.
    #[must_use]
    pub fn content_type_json(&self) -> bool {
        self.content_type_json
    }

    /// Joins a backend route onto the base URL.
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        if path.starts_with('/') {
            format!("{base}{path}")
        } else {
            format!("{base}/{path}")
        }
    }
}

/// Builder for `ClientConfig`.
#[derive(Debug)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Creates a new builder with the required base URL.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            config: ClientConfig::new(base_url),
        }
    }

    /// Sets the login endpoint path.
    #[must_use]
    pub fn login_path(mut self, path: impl Into<String>) -> Self {
        self.config.login_path = path.into();
        self
    }

    /// Sets the storage entry name.
    #[must_use]
    pub fn storage_key(mut self, key: impl Into<String>) -> Self {
        self.config.storage_key = key.into();
        self
    }

    /// Sets whether a 401 ends the local session.
    #[must_use]
    pub fn logout_on_unauthorized(mut self, enabled: bool) -> Self {
        self.config.logout_on_unauthorized = enabled;
        self
    }

    /// Sets whether JSON bodies get a default content type.
    #[must_use]
    pub fn content_type_json(mut self, enabled: bool) -> Self {
        self.config.content_type_json = enabled;
        self
    }

    /// Builds the `ClientConfig`.
    #[must_use]
    pub fn build(self) -> ClientConfig {
        self.config
    }
}
