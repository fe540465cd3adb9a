//! Screen controllers for the podium contest client.
//!
//! Each screen owns a [`ListView`] of the rows it shows and reloads it
//! wholesale from the backend. Calls go through the session's requester,
//! so the stored credential is attached and a logout takes effect on the
//! next call.
//!
//! Screens do not check roles. Whether a screen is offered is the
//! [`ViewState`](podium_session::ViewState)'s business; whether a call is
//! allowed is the backend's.

pub mod admin;
pub mod challenges;
pub mod client;
pub mod error;
pub mod judge;
pub mod list;
pub mod models;
pub mod participant;

pub use admin::AdminScreen;
pub use challenges::{ChallengeBoard, SubmissionHistory};
pub use client::{DEFAULT_ACTION_MESSAGE, ScreenClient};
pub use error::ScreenError;
pub use judge::JudgeScreen;
pub use list::ListView;
pub use models::{
    Challenge, ChallengeListing, GradeRequest, NewSubmission, ParticipantPanel, ParticipantReview,
    SubmissionRecord, SubmissionSummary, UserRecord,
};
pub use participant::ParticipantScreen;
