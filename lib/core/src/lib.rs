//! Core types shared by the podium contest client crates.
//!
//! This crate provides the `Result` alias used for layered error reporting
//! and the numeric identifiers the contest backend hands out.

pub mod error;
pub mod id;

pub use error::Result;
pub use id::{ParseIdError, SubmissionId, UserId};
