//! Membership lifecycle for a `(user, workspace)` pair.
//!
//! ```text
//! NONE ──invite──▶ PENDING ──approve──▶ APPROVED ──remove──▶ REMOVED
//!                     │  ▲                                     │
//!                     │  └──────────── re-invite ──────────────┤
//!                     └──reject──▶ REJECTED ──re-invite────────┘
//! ```
//!
//! OWNER rows are created only by [`Membership::owner`] together with the
//! workspace and never leave `APPROVED`.

use core::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use worksphere_core::{MembershipId, UserId, WorkspaceId};

use crate::Role;

// ─────────────────────────────────────────────────────────────────────────────
// Status / State
// ─────────────────────────────────────────────────────────────────────────────

/// Stored membership status.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MembershipStatus {
    Pending,
    Approved,
    Rejected,
}

impl MembershipStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            MembershipStatus::Pending => "PENDING",
            MembershipStatus::Approved => "APPROVED",
            MembershipStatus::Rejected => "REJECTED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "PENDING" => Some(MembershipStatus::Pending),
            "APPROVED" => Some(MembershipStatus::Approved),
            "REJECTED" => Some(MembershipStatus::Rejected),
            _ => None,
        }
    }
}

impl core::fmt::Display for MembershipStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Effective lifecycle state, derived from `status` and `removed_at`.
///
/// Removal stores `REJECTED` + `removed_at`; the timestamp is what tells a
/// revoked membership apart from a declined invitation.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MembershipState {
    Pending,
    Approved,
    Rejected,
    Removed,
}

impl MembershipState {
    /// Only an approved, non-removed membership grants any access.
    pub fn grants_access(self) -> bool {
        self == MembershipState::Approved
    }
}

impl core::fmt::Display for MembershipState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let s = match self {
            MembershipState::Pending => "PENDING",
            MembershipState::Approved => "APPROVED",
            MembershipState::Rejected => "REJECTED",
            MembershipState::Removed => "REMOVED",
        };
        f.write_str(s)
    }
}

/// Outcome of a decision on a pending invitation.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvitationDecision {
    Approve,
    Reject,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("decision must be APPROVE or REJECT, got '{0}'")]
pub struct UnknownDecision(pub String);

impl FromStr for InvitationDecision {
    type Err = UnknownDecision;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "APPROVE" => Ok(InvitationDecision::Approve),
            "REJECT" => Ok(InvitationDecision::Reject),
            _ => Err(UnknownDecision(s.to_string())),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Errors
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleError {
    #[error("the OWNER role cannot be granted by invitation")]
    OwnerRoleNotGrantable,

    #[error("the workspace owner's membership cannot be changed")]
    OwnerMembershipImmutable,

    #[error("membership is {0}, not PENDING")]
    NotPending(MembershipState),

    #[error("membership is already inactive")]
    AlreadyInactive,
}

// ─────────────────────────────────────────────────────────────────────────────
// Membership
// ─────────────────────────────────────────────────────────────────────────────

/// The row binding a user to a workspace. Exactly one per `(user_id, workspace_id)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Membership {
    pub id: MembershipId,
    pub user_id: UserId,
    pub workspace_id: WorkspaceId,
    pub role: Role,
    pub status: MembershipStatus,
    pub removed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Membership {
    /// The creator's membership, written atomically with the workspace.
    pub fn owner(user_id: UserId, workspace_id: WorkspaceId, at: DateTime<Utc>) -> Self {
        Self {
            id: MembershipId::new(),
            user_id,
            workspace_id,
            role: Role::Owner,
            status: MembershipStatus::Approved,
            removed_at: None,
            created_at: at,
            updated_at: at,
        }
    }

    /// Insert-or-update for an invitation.
    ///
    /// With no existing row a new `PENDING` membership is created. An existing
    /// row (in any state) is reset to `PENDING` with the new role and
    /// `removed_at` cleared; its id and `created_at` are kept.
    pub fn invite(
        existing: Option<Membership>,
        user_id: UserId,
        workspace_id: WorkspaceId,
        role: Role,
        at: DateTime<Utc>,
    ) -> Result<Membership, LifecycleError> {
        if !role.is_grantable() {
            return Err(LifecycleError::OwnerRoleNotGrantable);
        }

        match existing {
            None => Ok(Membership {
                id: MembershipId::new(),
                user_id,
                workspace_id,
                role,
                status: MembershipStatus::Pending,
                removed_at: None,
                created_at: at,
                updated_at: at,
            }),
            Some(mut row) => {
                row.ensure_not_owner()?;
                row.role = role;
                row.status = MembershipStatus::Pending;
                row.removed_at = None;
                row.updated_at = at;
                Ok(row)
            }
        }
    }

    pub fn state(&self) -> MembershipState {
        if self.removed_at.is_some() {
            return MembershipState::Removed;
        }
        match self.status {
            MembershipStatus::Pending => MembershipState::Pending,
            MembershipStatus::Approved => MembershipState::Approved,
            MembershipStatus::Rejected => MembershipState::Rejected,
        }
    }

    pub fn grants_access(&self) -> bool {
        self.state().grants_access()
    }

    pub fn is_owner(&self) -> bool {
        self.role == Role::Owner
    }

    /// `PENDING -> APPROVED | REJECTED`.
    pub fn decide(&mut self, decision: InvitationDecision, at: DateTime<Utc>) -> Result<(), LifecycleError> {
        self.ensure_not_owner()?;
        let state = self.state();
        if state != MembershipState::Pending {
            return Err(LifecycleError::NotPending(state));
        }

        self.status = match decision {
            InvitationDecision::Approve => MembershipStatus::Approved,
            InvitationDecision::Reject => MembershipStatus::Rejected,
        };
        self.updated_at = at;
        Ok(())
    }

    /// `APPROVED | PENDING -> REMOVED`. Stores `REJECTED` and stamps `removed_at`.
    pub fn remove(&mut self, at: DateTime<Utc>) -> Result<(), LifecycleError> {
        self.ensure_not_owner()?;
        match self.state() {
            MembershipState::Pending | MembershipState::Approved => {
                self.status = MembershipStatus::Rejected;
                self.removed_at = Some(at);
                self.updated_at = at;
                Ok(())
            }
            MembershipState::Rejected | MembershipState::Removed => Err(LifecycleError::AlreadyInactive),
        }
    }

    fn ensure_not_owner(&self) -> Result<(), LifecycleError> {
        if self.is_owner() {
            return Err(LifecycleError::OwnerMembershipImmutable);
        }
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
