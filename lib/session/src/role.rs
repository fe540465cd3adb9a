//! Roles and the role-gated view state.
//!
//! Visibility of each role's panel is derived from decoded claims and nothing
//! else. Revealing a panel grants no access: every call behind it is
//! authorized again by the backend.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::claims::Claims;

/// Platform role known to this client.
///
/// Claims may carry other tags; those are ignored rather than rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Contest entrant who creates submissions.
    Participant,
    /// Reviewer who grades submissions.
    Judge,
    /// Operator who manages users and role assignments.
    Admin,
}

impl Role {
    /// Every role the client has a panel for.
    pub const ALL: [Role; 3] = [Role::Participant, Role::Judge, Role::Admin];

    /// Maps a claim tag to a role, if it is one this client knows.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "participant" => Some(Self::Participant),
            "judge" => Some(Self::Judge),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }

    /// Returns the tag the backend uses for this role.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Participant => "participant",
            Self::Judge => "judge",
            Self::Admin => "admin",
        }
    }

    /// Returns the backend route the role's panel opens with.
    #[must_use]
    pub fn landing_path(&self) -> &'static str {
        match self {
            Self::Participant => "/participant/panel",
            Self::Judge => "/judge/review",
            Self::Admin => "/admin/users",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_tag(s.trim()).ok_or_else(|| format!("unknown role '{s}'"))
    }
}

/// The set of visible role-gated elements.
///
/// A pure function of whether a session exists and which roles it claims.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ViewState {
    authenticated: bool,
    panels: BTreeSet<Role>,
}

impl ViewState {
    /// Returns true if a session is active.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    /// Returns true if the given role's panel is visible.
    #[must_use]
    pub fn shows(&self, role: Role) -> bool {
        self.panels.contains(&role)
    }

    /// The login control is shown only while logged out.
    #[must_use]
    pub fn login_visible(&self) -> bool {
        !self.authenticated
    }

    /// The logout control is shown only while logged in.
    #[must_use]
    pub fn logout_visible(&self) -> bool {
        self.authenticated
    }

    /// The actions block is shown for any session, even one with no roles.
    #[must_use]
    pub fn actions_visible(&self) -> bool {
        self.authenticated
    }

    /// Returns the visible role panels in display order.
    pub fn visible_roles(&self) -> impl Iterator<Item = Role> + '_ {
        self.panels.iter().copied()
    }
}

/// Computes the view state from claims.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleGate {
    known: BTreeSet<Role>,
}

impl RoleGate {
    /// Creates a gate for every role the client knows.
    #[must_use]
    pub fn new() -> Self {
        Self::with_roles(Role::ALL)
    }

    /// Creates a gate that only manages the given roles' panels.
    #[must_use]
    pub fn with_roles(roles: impl IntoIterator<Item = Role>) -> Self {
        Self {
            known: roles.into_iter().collect(),
        }
    }

    /// Computes which panels the claims reveal.
    ///
    /// `None` yields the same state as [`RoleGate::reset`].
    #[must_use]
    pub fn apply(&self, claims: Option<&Claims>) -> ViewState {
        let Some(claims) = claims else {
            return self.reset();
        };

        let panels = self
            .known
            .iter()
            .copied()
            .filter(|role| claims.has_role(role.as_str()))
            .collect();

        ViewState {
            authenticated: true,
            panels,
        }
    }

    /// Returns the logged-out state with every panel hidden.
    #[must_use]
    pub fn reset(&self) -> ViewState {
        ViewState::default()
    }
}

impl Default for RoleGate {
    fn default() -> Self {
        Self::new()
    }
}
