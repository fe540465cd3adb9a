//! Error types for screen controllers.

use std::fmt;

use podium_session::RequestError;
use rootcause::Report;

/// Errors from loading or acting on a screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScreenError {
    /// The backend call failed.
    Request(RequestError),
    /// The session changed while the call was in flight; the result was dropped.
    Stale,
}

impl ScreenError {
    /// Returns the text to show the user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Request(err) => err.user_message(),
            Self::Stale => "The session changed, please retry".to_string(),
        }
    }

    /// Returns the request error behind this failure, if any.
    #[must_use]
    pub fn request(&self) -> Option<&RequestError> {
        match self {
            Self::Request(err) => Some(err),
            Self::Stale => None,
        }
    }

    pub(crate) fn from_request(report: &Report<RequestError>) -> Self {
        Self::Request(report.current_context().clone())
    }
}

impl From<RequestError> for ScreenError {
    fn from(err: RequestError) -> Self {
        Self::Request(err)
    }
}

impl fmt::Display for ScreenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Request(err) => write!(f, "screen request failed: {err}"),
            Self::Stale => write!(f, "response belongs to an ended session"),
        }
    }
}

impl std::error::Error for ScreenError {}
