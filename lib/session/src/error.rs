//! Error types for the session crate.
//!
//! Errors are returned wrapped in rootcause `Report`s:
//! - `MalformedCredential`: a credential whose payload cannot be read
//! - `StoreError`: the credential store could not persist a change
//! - `LoginError`: a login attempt that did not produce a session
//! - `RequestError`: an authenticated call that failed
//!
//! Every error offers `user_message()`, the text a screen shows for it.

use std::fmt;

/// Message shown when the backend rejects a login without explaining why.
pub const GENERIC_LOGIN_FAILURE: &str = "Login failed";

/// A credential whose payload segment could not be decoded into claims.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedCredential {
    /// What was wrong with the credential.
    pub reason: String,
}

impl MalformedCredential {
    pub(crate) fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for MalformedCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "malformed credential: {}", self.reason)
    }
}

impl std::error::Error for MalformedCredential {}

/// Errors from credential store backends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Reading or writing the backing file failed.
    Io { path: String, details: String },
    /// The storage facility is not reachable (no window, storage disabled).
    Unavailable { details: String },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, details } => {
                write!(f, "credential file '{path}' error: {details}")
            }
            Self::Unavailable { details } => {
                write!(f, "credential storage unavailable: {details}")
            }
        }
    }
}

impl std::error::Error for StoreError {}

/// Errors from a login attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginError {
    /// The backend answered with a non-success status.
    Rejected { status: u16, message: String },
    /// The backend answered with a token that cannot be decoded.
    MalformedCredential { reason: String },
    /// The login endpoint could not be reached.
    NetworkFailure { details: String },
    /// The credential could not be written to the store.
    Storage { details: String },
    /// A logout or another login finished while this attempt was in flight.
    Superseded,
}

impl LoginError {
    /// Returns the text to show the user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Rejected { message, .. } => message.clone(),
            Self::MalformedCredential { .. } => {
                "The server returned an unreadable credential".to_string()
            }
            Self::NetworkFailure { .. } => "Error logging in".to_string(),
            Self::Storage { .. } => "Could not save the session".to_string(),
            Self::Superseded => "Login cancelled".to_string(),
        }
    }
}

impl fmt::Display for LoginError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rejected { status, message } => {
                write!(f, "login rejected with status {status}: {message}")
            }
            Self::MalformedCredential { reason } => {
                write!(f, "login returned a malformed credential: {reason}")
            }
            Self::NetworkFailure { details } => {
                write!(f, "login request failed: {details}")
            }
            Self::Storage { details } => {
                write!(f, "failed to store credential: {details}")
            }
            Self::Superseded => write!(f, "login superseded by a newer session change"),
        }
    }
}

impl std::error::Error for LoginError {}

/// Errors from calls made through `AuthenticatedRequest`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    /// Transport-level failure; no response was received.
    NetworkFailure { details: String },
    /// HTTP 401: the backend did not accept the credential.
    Unauthorized { message: Option<String> },
    /// HTTP 403: the credential lacks the role the route requires.
    Forbidden { message: Option<String> },
    /// Any other non-success status.
    Rejected {
        status: u16,
        code: Option<String>,
        message: Option<String>,
    },
    /// A caller-supplied header cannot be sent.
    InvalidHeader { name: String },
    /// A request or response body could not be (de)serialized.
    InvalidBody { details: String },
}

impl RequestError {
    /// Returns the HTTP status behind this error, if a response arrived.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized { .. } => Some(401),
            Self::Forbidden { .. } => Some(403),
            Self::Rejected { status, .. } => Some(*status),
            Self::NetworkFailure { .. } | Self::InvalidHeader { .. } | Self::InvalidBody { .. } => {
                None
            }
        }
    }

    /// Returns the text to show the user.
    ///
    /// Backend-provided messages are passed through unchanged.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::NetworkFailure { .. } => "Could not reach the server".to_string(),
            Self::Unauthorized { message } => message
                .clone()
                .unwrap_or_else(|| "Not logged in".to_string()),
            Self::Forbidden { message } => message.clone().unwrap_or_else(|| "Forbidden".to_string()),
            Self::Rejected {
                status, message, ..
            } => message
                .clone()
                .unwrap_or_else(|| format!("Request failed with status {status}")),
            Self::InvalidHeader { name } => format!("Invalid request header '{name}'"),
            Self::InvalidBody { .. } => "The server returned an unexpected response".to_string(),
        }
    }
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NetworkFailure { details } => write!(f, "network failure: {details}"),
            Self::Unauthorized { message } => {
                write!(f, "unauthorized: {}", message.as_deref().unwrap_or("no message"))
            }
            Self::Forbidden { message } => {
                write!(f, "forbidden: {}", message.as_deref().unwrap_or("no message"))
            }
            Self::Rejected {
                status,
                code,
                message,
            } => {
                write!(f, "request rejected with status {status}")?;
                if let Some(code) = code {
                    write!(f, " ({code})")?;
                }
                if let Some(message) = message {
                    write!(f, ": {message}")?;
                }
                Ok(())
            }
            Self::InvalidHeader { name } => write!(f, "invalid header '{name}'"),
            Self::InvalidBody { details } => write!(f, "invalid body: {details}"),
        }
    }
}

impl std::error::Error for RequestError {}
