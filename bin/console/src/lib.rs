//! Command-line front end for the podium contest platform.
//!
//! The credential is kept in a file between runs, so `podium login` followed
//! by `podium admin users` behaves like a page reload in the browser client.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;

use std::sync::Arc;

use podium_session::{FileCredentialStore, SessionController};
use rootcause::Report;
use tracing::info;

use crate::cli::Cli;
use crate::config::ConsoleConfig;
use crate::error::ConsoleError;

/// Loads configuration, restores the stored session and runs the command.
///
/// # Errors
///
/// Returns the failure to print; the process exits non-zero.
pub async fn run(cli: Cli) -> Result<Vec<String>, Report<ConsoleError>> {
    let config = ConsoleConfig::load(cli.config.as_deref(), cli.base_url).map_err(|e| {
        ConsoleError::Config {
            details: e.to_string(),
        }
    })?;
    info!(base_url = config.client.base_url(), "loaded configuration");

    let store = Arc::new(FileCredentialStore::new(
        &config.credentials_path,
        config.client.storage_key(),
    ));
    let session = Arc::new(SessionController::new(
        config.client,
        store,
        reqwest::Client::new(),
    ));
    session.restore();

    commands::dispatch(cli.command, session).await
}
