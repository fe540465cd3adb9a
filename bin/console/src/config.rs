//! Console configuration.
//!
//! Loaded via the `config` crate from an optional file and from environment
//! variables prefixed `PODIUM`, with `__` between nesting levels:
//!
//! ```text
//! PODIUM__CLIENT__BASE_URL=http://127.0.0.1:5000
//! PODIUM__CLIENT__LOGOUT_ON_UNAUTHORIZED=true
//! PODIUM__CREDENTIALS_PATH=/home/me/.podium/credentials.json
//! ```
//!
//! See [`ClientConfig`] for the backend settings.

use std::path::{Path, PathBuf};

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment};
use podium_session::ClientConfig;
use serde::Deserialize;

/// Console configuration composed from the client config.
#[derive(Debug, Deserialize)]
pub struct ConsoleConfig {
    /// How to reach the backend.
    pub client: ClientConfig,

    /// File holding the stored credential between runs.
    #[serde(default = "default_credentials_path")]
    pub credentials_path: PathBuf,
}

fn default_credentials_path() -> PathBuf {
    PathBuf::from(".podium").join("credentials.json")
}

fn environment() -> Environment {
    Environment::with_prefix("PODIUM")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

impl ConsoleConfig {
    /// Loads configuration from `file` (if given) and the environment.
    ///
    /// `base_url` overrides every other source.
    ///
    /// # Errors
    ///
    /// Returns an error if required configuration is missing or invalid.
    pub fn load(file: Option<&Path>, base_url: Option<String>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();
        if let Some(path) = file {
            builder = builder.add_source(config::File::from(path));
        }
        Self::from_sources(builder, environment(), base_url)
    }

    fn from_sources(
        builder: ConfigBuilder<DefaultState>,
        env: Environment,
        base_url: Option<String>,
    ) -> Result<Self, ConfigError> {
        builder
            .add_source(env)
            .set_override_option("client.base_url", base_url)?
            .build()?
            .try_deserialize()
    }
}
