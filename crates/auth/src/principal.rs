use serde::Serialize;

use worksphere_core::{UserId, WorkspaceId};

use crate::error::AccessError;
use crate::membership::{Membership, MembershipState};
use crate::Role;

/// The workspace a request asked for, as carried by the transport.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum WorkspaceSelector {
    Missing,
    /// Present but not a valid identifier. Treated as an unknown workspace.
    Malformed,
    Id(WorkspaceId),
}

impl WorkspaceSelector {
    pub fn from_raw(raw: Option<&str>) -> Self {
        match raw.map(str::trim).filter(|s| !s.is_empty()) {
            None => WorkspaceSelector::Missing,
            Some(s) => s
                .parse::<WorkspaceId>()
                .map(WorkspaceSelector::Id)
                .unwrap_or(WorkspaceSelector::Malformed),
        }
    }
}

/// Explicit per-request context. Passed down into every operation.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub user: Option<UserId>,
    pub workspace: WorkspaceSelector,
}

impl RequestContext {
    pub fn new(user: Option<UserId>, workspace: WorkspaceSelector) -> Self {
        Self { user, workspace }
    }

    pub fn authenticated(user: UserId) -> Self {
        Self::new(Some(user), WorkspaceSelector::Missing)
    }

    pub fn in_workspace(user: UserId, workspace: WorkspaceId) -> Self {
        Self::new(Some(user), WorkspaceSelector::Id(workspace))
    }

    /// Authentication is checked before anything else.
    pub fn actor(&self) -> Result<UserId, AccessError> {
        self.user.ok_or(AccessError::Unauthenticated)
    }

    /// `(actor, workspace)` in the order failures must surface.
    pub fn target(&self) -> Result<(UserId, WorkspaceId), AccessError> {
        let actor = self.actor()?;
        match self.workspace {
            WorkspaceSelector::Missing => Err(AccessError::NoWorkspace),
            WorkspaceSelector::Malformed => Err(AccessError::workspace_not_found()),
            WorkspaceSelector::Id(ws) => Ok((actor, ws)),
        }
    }
}

/// An actor that holds an active membership in a live workspace.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub struct WorkspaceAccess {
    pub user_id: UserId,
    pub workspace_id: WorkspaceId,
    pub role: Role,
}

impl WorkspaceAccess {
    /// Only constructible from an active membership, so the state is fixed.
    pub fn state(&self) -> MembershipState {
        MembershipState::Approved
    }
}

/// Resolve an actor's access to a workspace from already-loaded rows.
///
/// Every failure here is `NotFound("workspace")`: a missing workspace, a
/// deleted one and a non-active membership look identical to the caller.
pub fn resolve_access(
    actor: UserId,
    workspace_id: WorkspaceId,
    workspace_live: bool,
    membership: Option<&Membership>,
) -> Result<WorkspaceAccess, AccessError> {
    if !workspace_live {
        return Err(AccessError::workspace_not_found());
    }
    let membership = membership
        .filter(|m| m.user_id == actor && m.workspace_id == workspace_id)
        .filter(|m| m.grants_access())
        .ok_or_else(AccessError::workspace_not_found)?;

    Ok(WorkspaceAccess {
        user_id: actor,
        workspace_id,
        role: membership.role,
    })
}
