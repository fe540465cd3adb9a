//! Console error types.

use std::fmt;

use podium_session::{LoginError, Role};
use podium_screens::ScreenError;

/// Errors surfaced to the console user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleError {
    /// Configuration could not be loaded.
    Config { details: String },
    /// Reading the password from the terminal failed.
    Prompt { details: String },
    /// The login attempt failed.
    Login(LoginError),
    /// A screen call failed.
    Screen(ScreenError),
    /// The command belongs to a panel the current session does not show.
    PanelHidden { role: Role },
}

impl ConsoleError {
    /// Returns the text printed for this error.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Config { details } => format!("Configuration error: {details}"),
            Self::Prompt { details } => format!("Could not read password: {details}"),
            Self::Login(err) => err.user_message(),
            Self::Screen(err) => err.user_message(),
            Self::PanelHidden { role } => {
                format!("The {role} panel is not available for this session")
            }
        }
    }
}

impl From<LoginError> for ConsoleError {
    fn from(err: LoginError) -> Self {
        Self::Login(err)
    }
}

impl From<ScreenError> for ConsoleError {
    fn from(err: ScreenError) -> Self {
        Self::Screen(err)
    }
}

impl fmt::Display for ConsoleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config { details } => write!(f, "configuration error: {details}"),
            Self::Prompt { details } => write!(f, "password prompt failed: {details}"),
            Self::Login(err) => write!(f, "{err}"),
            Self::Screen(err) => write!(f, "{err}"),
            Self::PanelHidden { role } => write!(f, "{role} panel hidden"),
        }
    }
}

impl std::error::Error for ConsoleError {}
