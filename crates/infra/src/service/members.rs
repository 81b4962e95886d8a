use serde_json::json;

use worksphere_auth::guards::member;
use worksphere_auth::{AccessError, InvitationDecision, Membership, RequestContext};
use worksphere_core::UserId;
use worksphere_events::{AuditAction, AuditEvent};
use worksphere_workspace::normalize_email;

use super::{ServiceResult, WorkspaceService};
use crate::store::{Invitation, MemberRecord};

impl WorkspaceService {
    /// Every membership row of the active workspace, in any state.
    pub async fn list_members(&self, ctx: &RequestContext) -> ServiceResult<Vec<MemberRecord>> {
        let access = self.active_workspace(ctx).await?;
        member::authorize_list(&access)?;
        Ok(self.store.list_members(access.workspace_id).await?)
    }

    /// Invite (or re-invite) a signed-up user. Always lands in `PENDING`.
    ///
    /// `role` is the raw requested role, VIEWER when absent. The caller's own
    /// role is checked before the inputs are validated and before the invitee
    /// is looked up, so a caller without ADMIN cannot discover which emails are
    /// registered.
    pub async fn invite_member(
        &self,
        ctx: &RequestContext,
        email: &str,
        role: Option<&str>,
    ) -> ServiceResult<Membership> {
        let access = self.active_workspace(ctx).await?;
        let role = member::authorize_invite(&access, role, None)?;
        let email = normalize_email(email)?;

        let invitee = self
            .store
            .find_user_by_email(&email)
            .await?
            .ok_or(AccessError::NotFound("user"))?;

        let now = self.now();
        let audit = AuditEvent::new(AuditAction::MemberInvite, invitee.id, now)
            .in_workspace(access.workspace_id)
            .by(access.user_id)
            .with_meta(json!({ "targetUserId": invitee.id, "role": role }));
        let invitation = Invitation {
            user_id: invitee.id,
            workspace_id: access.workspace_id,
            role,
            at: now,
        };
        // the OWNER row is protected inside the upsert itself
        let (membership, entry) = self.store.upsert_invitation(invitation, audit).await?;
        self.emit(&entry);
        Ok(membership)
    }

    /// Approve or reject a pending invitation. `decision` is parsed once the
    /// target row is found and the caller is allowed to decide on it.
    ///
    /// No rule stops an ADMIN from deciding on their own row.
    pub async fn decide_invitation(
        &self,
        ctx: &RequestContext,
        user_id: UserId,
        decision: &str,
    ) -> ServiceResult<Membership> {
        let access = self.active_workspace(ctx).await?;
        let target = self.store.find_membership(user_id, access.workspace_id).await?;
        let target = member::authorize_decision(&access, target.as_ref())?;
        let decision = decision
            .parse::<InvitationDecision>()
            .map_err(|e| AccessError::BadRequest(e.to_string()))?;

        let from = target.state();
        let now = self.now();
        let mut updated = target.clone();
        updated.decide(decision, now)?;

        let action = match decision {
            InvitationDecision::Approve => AuditAction::MemberApprove,
            InvitationDecision::Reject => AuditAction::MemberReject,
        };
        let audit = AuditEvent::new(action, updated.id, now)
            .in_workspace(access.workspace_id)
            .by(access.user_id)
            .with_meta(json!({ "targetUserId": user_id }));
        let entry = self.store.transition_membership(&updated, from, audit).await?;
        self.emit(&entry);
        Ok(updated)
    }

    /// Revoke a membership. The row stays, marked `REJECTED` with `removed_at`.
    pub async fn remove_member(&self, ctx: &RequestContext, user_id: UserId) -> ServiceResult<Membership> {
        let access = self.active_workspace(ctx).await?;
        let target = self.store.find_membership(user_id, access.workspace_id).await?;
        let target = member::authorize_removal(&access, target.as_ref())?;

        let from = target.state();
        let now = self.now();
        let mut updated = target.clone();
        updated.remove(now)?;

        let audit = AuditEvent::new(AuditAction::MemberRemove, updated.id, now)
            .in_workspace(access.workspace_id)
            .by(access.user_id)
            .with_meta(json!({ "targetUserId": user_id }));
        let entry = self.store.transition_membership(&updated, from, audit).await?;
        self.emit(&entry);
        Ok(updated)
    }
}
