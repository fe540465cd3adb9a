//! Command-line arguments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use podium_core::{SubmissionId, UserId};
use podium_session::Role;

#[derive(Debug, Parser)]
#[command(name = "podium", about = "Command-line client for the podium contest platform")]
pub struct Cli {
    /// Configuration file (TOML, YAML or JSON).
    #[arg(long, global = true, env = "PODIUM_CONFIG")]
    pub config: Option<PathBuf>,

    /// Backend origin; overrides the configuration.
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Log in and store the issued credential.
    Login(LoginArgs),
    /// Forget the stored credential.
    Logout,
    /// Show which controls and panels are visible.
    Status,
    /// List open challenges.
    Challenges,
    /// List uploaded submissions.
    Submissions,
    /// Participant panel.
    #[command(subcommand)]
    Participant(ParticipantCommand),
    /// Judge panel.
    #[command(subcommand)]
    Judge(JudgeCommand),
    /// Admin panel.
    #[command(subcommand)]
    Admin(AdminCommand),
}

impl Command {
    /// Returns the role whose panel this command belongs to.
    #[must_use]
    pub fn panel(&self) -> Option<Role> {
        match self {
            Self::Participant(_) => Some(Role::Participant),
            Self::Judge(_) => Some(Role::Judge),
            Self::Admin(_) => Some(Role::Admin),
            Self::Login(_) | Self::Logout | Self::Status | Self::Challenges | Self::Submissions => None,
        }
    }
}

#[derive(Debug, Args)]
pub struct LoginArgs {
    #[arg(long)]
    pub email: String,

    /// Prompted for when omitted.
    #[arg(long, env = "PODIUM_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum ParticipantCommand {
    /// List your submissions.
    Panel,
    /// Create a submission.
    Submit {
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum JudgeCommand {
    /// List participants and their submissions.
    Review,
    /// Grade a submission.
    Grade {
        #[arg(long)]
        user_id: UserId,
        #[arg(long)]
        submission_id: SubmissionId,
        #[arg(long)]
        grade: String,
        #[arg(long, default_value = "")]
        comment: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum AdminCommand {
    /// List all users.
    Users,
    /// Grant a role.
    AssignRole {
        #[arg(long)]
        user_id: UserId,
        #[arg(long)]
        role: Role,
    },
    /// Revoke a role.
    RemoveRole {
        #[arg(long)]
        user_id: UserId,
        #[arg(long)]
        role: Role,
    },
    /// Delete a user.
    DeleteUser {
        #[arg(long)]
        user_id: UserId,
    },
}
