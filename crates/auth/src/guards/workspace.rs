use worksphere_core::{UserId, WorkspaceId};

use crate::authorize::AccessRequest;
use crate::error::AccessError;
use crate::guards::enforce;
use crate::membership::Membership;
use crate::permissions::Action;
use crate::principal::{resolve_access, WorkspaceAccess};

/// Soft-delete a workspace: only the OWNER of that exact workspace.
///
/// An absent or already-deleted workspace, or one the actor has no active
/// membership in, is `NotFound`; an active non-owner is `Forbidden`.
pub fn authorize_delete(
    actor: UserId,
    workspace_id: WorkspaceId,
    workspace_live: bool,
    membership: Option<&Membership>,
) -> Result<WorkspaceAccess, AccessError> {
    let access = resolve_access(actor, workspace_id, workspace_live, membership)?;
    enforce(
        AccessRequest::new(Action::DeleteWorkspace, access.role, access.state()),
        &access,
    )?;
    Ok(access)
}

/// Switching only needs the unified workspace lookup to succeed.
pub fn authorize_switch(
    actor: UserId,
    workspace_id: WorkspaceId,
    workspace_live: bool,
    membership: Option<&Membership>,
) -> Result<WorkspaceAccess, AccessError> {
    let access = resolve_access(actor, workspace_id, workspace_live, membership)?;
    enforce(
        AccessRequest::new(Action::SwitchWorkspace, access.role, access.state()),
        &access,
    )?;
    Ok(access)
}
