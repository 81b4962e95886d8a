use crate::authorize::{AccessRequest, DenyReason};
use crate::error::AccessError;
use crate::guards::enforce;
use crate::membership::Membership;
use crate::permissions::Action;
use crate::principal::WorkspaceAccess;
use crate::Role;

fn request(access: &WorkspaceAccess, action: Action) -> AccessRequest {
    AccessRequest::new(action, access.role, access.state())
}

pub fn authorize_list(access: &WorkspaceAccess) -> Result<(), AccessError> {
    enforce(request(access, Action::ListMembers), access)
}

/// Invitations create or reset a row, so the role check runs first and the
/// target user's existence is resolved by the caller afterwards.
///
/// `requested` is the caller's raw role, VIEWER when absent. It is parsed
/// only once the caller is known to hold ADMIN. `existing` is the current
/// row for the invited user, if any.
pub fn authorize_invite(
    access: &WorkspaceAccess,
    requested: Option<&str>,
    existing: Option<&Membership>,
) -> Result<Role, AccessError> {
    enforce(request(access, Action::InviteMember), access)?;
    let granted = match requested {
        None => Role::Viewer,
        Some(raw) => raw.parse::<Role>().map_err(|e| AccessError::BadRequest(e.to_string()))?,
    };
    enforce(request(access, Action::InviteMember).targeting(granted), access)?;
    if existing.is_some_and(|m| m.workspace_id == access.workspace_id && m.is_owner()) {
        return Err(AccessError::Forbidden(DenyReason::OwnerMembershipImmutable));
    }
    Ok(granted)
}

/// Approve/reject. The target row must exist in this workspace.
pub fn authorize_decision<'a>(
    access: &WorkspaceAccess,
    target: Option<&'a Membership>,
) -> Result<&'a Membership, AccessError> {
    let target = locate_member(access, target)?;
    enforce(request(access, Action::DecideInvitation).targeting(target.role), access)?;
    Ok(target)
}

pub fn authorize_removal<'a>(
    access: &WorkspaceAccess,
    target: Option<&'a Membership>,
) -> Result<&'a Membership, AccessError> {
    let target = locate_member(access, target)?;
    enforce(request(access, Action::RemoveMember).targeting(target.role), access)?;
    Ok(target)
}

fn locate_member<'a>(
    access: &WorkspaceAccess,
    target: Option<&'a Membership>,
) -> Result<&'a Membership, AccessError> {
    target
        .filter(|m| m.workspace_id == access.workspace_id)
        .ok_or(AccessError::NotFound("member"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guards::fixtures::access;
    use crate::membership::InvitationDecision;
    use chrono::Utc;
    use worksphere_core::{UserId, WorkspaceId};

    fn approved(a: &WorkspaceAccess, role: Role) -> Membership {
        let mut m = Membership::invite(None, UserId::new(), a.workspace_id, role, Utc::now()).unwrap();
        m.decide(InvitationDecision::Approve, Utc::now()).unwrap();
        m
    }

    #[test]
    fn any_member_lists() {
        assert!(authorize_list(&access(Role::Viewer)).is_ok());
    }

    #[test]
    fn invite_requires_admin_and_grantable_role() {
        let member = access(Role::Member);
        assert_eq!(
            authorize_invite(&member, Some("VIEWER"), None),
            Err(AccessError::Forbidden(DenyReason::InsufficientRole { required: Role::Admin }))
        );

        let admin = access(Role::Admin);
        assert_eq!(authorize_invite(&admin, Some("admin"), None), Ok(Role::Admin));
        assert_eq!(authorize_invite(&admin, None, None), Ok(Role::Viewer));
        assert_eq!(authorize_invite(&admin, Some("OWNER"), None).map_err(|e| e.code().as_str()), Err("BAD_REQUEST"));
    }

    #[test]
    fn unknown_role_is_checked_after_the_caller_role() {
        let member = access(Role::Member);
        assert!(matches!(authorize_invite(&member, Some("ROOT"), None), Err(AccessError::Forbidden(_))));

        let admin = access(Role::Admin);
        assert!(matches!(authorize_invite(&admin, Some("ROOT"), None), Err(AccessError::BadRequest(_))));
    }

    #[test]
    fn invite_cannot_reset_the_owner_row() {
        let admin = access(Role::Admin);
        let owner = Membership::owner(UserId::new(), admin.workspace_id, Utc::now());
        assert_eq!(
            authorize_invite(&admin, None, Some(&owner)),
            Err(AccessError::Forbidden(DenyReason::OwnerMembershipImmutable))
        );
    }

    #[test]
    fn removal_rules() {
        let admin = access(Role::Admin);
        let peer = approved(&admin, Role::Admin);
        assert!(authorize_removal(&admin, Some(&peer)).is_ok());

        let owner_row = Membership::owner(UserId::new(), admin.workspace_id, Utc::now());
        assert_eq!(
            authorize_removal(&admin, Some(&owner_row)),
            Err(AccessError::Forbidden(DenyReason::OwnerMembershipImmutable))
        );

        let owner = access(Role::Owner);
        let owner_row = Membership::owner(owner.user_id, owner.workspace_id, Utc::now());
        assert!(authorize_removal(&owner, Some(&owner_row)).is_err());

        let member = access(Role::Member);
        let viewer = approved(&member, Role::Viewer);
        assert!(matches!(authorize_removal(&member, Some(&viewer)), Err(AccessError::Forbidden(_))));
    }

    #[test]
    fn missing_or_foreign_target_is_not_found() {
        let admin = access(Role::Admin);
        let mut foreign = approved(&admin, Role::Viewer);
        foreign.workspace_id = WorkspaceId::new();

        assert_eq!(authorize_decision(&admin, None), Err(AccessError::NotFound("member")));
        assert_eq!(authorize_removal(&admin, Some(&foreign)), Err(AccessError::NotFound("member")));
    }

    #[test]
    fn existence_precedes_role_for_decisions() {
        let viewer = access(Role::Viewer);
        assert_eq!(authorize_decision(&viewer, None), Err(AccessError::NotFound("member")));
    }
}
