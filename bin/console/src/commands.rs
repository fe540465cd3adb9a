//! Command dispatch.
//!
//! Each command returns the lines to print. Role panel commands are refused
//! locally when the panel is hidden; that is a courtesy, the backend still
//! authorizes every call.

use std::sync::Arc;

use podium_screens::{
    AdminScreen, ChallengeBoard, GradeRequest, JudgeScreen, ParticipantScreen, ScreenError,
    SubmissionHistory,
};
use podium_session::{LoginError, SessionController, ViewState};
use rootcause::Report;
use tracing::{debug, instrument};

use crate::cli::{AdminCommand, Command, JudgeCommand, LoginArgs, ParticipantCommand};
use crate::error::ConsoleError;

/// Describes a view state as printable lines.
#[must_use]
pub fn render_view(view: &ViewState) -> Vec<String> {
    if !view.is_authenticated() {
        return vec!["Logged out".to_string(), "Controls: login".to_string()];
    }

    let mut controls = Vec::new();
    if view.logout_visible() {
        controls.push("logout");
    }
    if view.actions_visible() {
        controls.push("actions");
    }

    let mut lines = vec![
        "Logged in".to_string(),
        format!("Controls: {}", controls.join(", ")),
    ];
    let panels: Vec<String> = view
        .visible_roles()
        .map(|role| format!("Panel: {role} ({})", role.landing_path()))
        .collect();
    if panels.is_empty() {
        lines.push("Panels: none".to_string());
    } else {
        lines.extend(panels);
    }
    lines
}

fn screen_failed(report: &Report<ScreenError>) -> ConsoleError {
    ConsoleError::Screen(report.current_context().clone())
}

fn login_failed(report: &Report<LoginError>) -> ConsoleError {
    ConsoleError::Login(report.current_context().clone())
}

/// Runs one command against the session.
///
/// # Errors
///
/// Returns the failure to show the user; the caller exits non-zero.
#[instrument(skip_all, fields(panel = ?command.panel()))]
pub async fn dispatch(
    command: Command,
    session: Arc<SessionController>,
) -> Result<Vec<String>, Report<ConsoleError>> {
    if let Some(role) = command.panel() {
        if !session.view().shows(role) {
            debug!(%role, "refusing command for hidden panel");
            return Err(ConsoleError::PanelHidden { role }.into());
        }
    }

    match command {
        Command::Login(args) => login(&session, args).await,
        Command::Logout => {
            let view = session.logout();
            let mut lines = vec!["Logged out".to_string()];
            lines.extend(render_view(&view).into_iter().skip(1));
            Ok(lines)
        }
        Command::Status => Ok(render_view(&session.view())),
        Command::Challenges => {
            let mut board = ChallengeBoard::new(session);
            let list = board.load_challenges().await.map_err(|e| screen_failed(&e))?;
            Ok(list.lines())
        }
        Command::Submissions => {
            let mut history = SubmissionHistory::new(session);
            let list = history.load().await.map_err(|e| screen_failed(&e))?;
            Ok(list.lines())
        }
        Command::Participant(command) => participant(session, command).await,
        Command::Judge(command) => judge(session, command).await,
        Command::Admin(command) => admin(session, command).await,
    }
}

async fn login(session: &SessionController, args: LoginArgs) -> Result<Vec<String>, Report<ConsoleError>> {
    let password = match args.password {
        Some(password) => password,
        None => rpassword::prompt_password("Password: ").map_err(|e| ConsoleError::Prompt {
            details: e.to_string(),
        })?,
    };

    session
        .login(&args.email, &password)
        .await
        .map_err(|e| login_failed(&e))?;

    let mut lines = vec![format!("Logged in as {}", args.email)];
    lines.extend(render_view(&session.view()).into_iter().skip(1));
    Ok(lines)
}

async fn participant(
    session: Arc<SessionController>,
    command: ParticipantCommand,
) -> Result<Vec<String>, Report<ConsoleError>> {
    let mut screen = ParticipantScreen::new(session);
    match command {
        ParticipantCommand::Panel => {
            let list = screen.load_submissions().await.map_err(|e| screen_failed(&e))?;
            Ok(list.lines())
        }
        ParticipantCommand::Submit { title, content } => {
            let message = screen
                .create_submission(&title, &content)
                .await
                .map_err(|e| screen_failed(&e))?;
            Ok(vec![message])
        }
    }
}

async fn judge(
    session: Arc<SessionController>,
    command: JudgeCommand,
) -> Result<Vec<String>, Report<ConsoleError>> {
    let mut screen = JudgeScreen::new(session);
    match command {
        JudgeCommand::Review => {
            let list = screen.load_participants().await.map_err(|e| screen_failed(&e))?;
            Ok(list.lines())
        }
        JudgeCommand::Grade {
            user_id,
            submission_id,
            grade,
            comment,
        } => {
            let request = GradeRequest::new(user_id, submission_id, grade).with_comment(comment);
            let message = screen
                .submit_grade(&request)
                .await
                .map_err(|e| screen_failed(&e))?;
            Ok(vec![message])
        }
    }
}

async fn admin(
    session: Arc<SessionController>,
    command: AdminCommand,
) -> Result<Vec<String>, Report<ConsoleError>> {
    let mut screen = AdminScreen::new(session);
    let message = match command {
        AdminCommand::Users => {
            let list = screen.load_users().await.map_err(|e| screen_failed(&e))?;
            return Ok(list.lines());
        }
        AdminCommand::AssignRole { user_id, role } => screen.assign_role(user_id, role).await,
        AdminCommand::RemoveRole { user_id, role } => screen.remove_role(user_id, role).await,
        AdminCommand::DeleteUser { user_id } => screen.delete_user(user_id).await,
    }
    .map_err(|e| screen_failed(&e))?;
    Ok(vec![message])
}
