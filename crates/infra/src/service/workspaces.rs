use worksphere_auth::guards::workspace::{authorize_delete, authorize_switch};
use worksphere_auth::{AccessError, Membership, RequestContext};
use worksphere_core::WorkspaceId;
use worksphere_events::{AuditAction, AuditEvent};
use worksphere_workspace::{Workspace, WorkspaceMembership};

use super::{ServiceResult, WorkspaceService};

impl WorkspaceService {
    /// Any authenticated user may create a workspace; they become its OWNER.
    pub async fn create_workspace(&self, ctx: &RequestContext, name: &str) -> ServiceResult<Workspace> {
        let actor = ctx.actor()?;
        let now = self.now();
        let workspace = Workspace::create(name, actor, now)?;
        let owner = Membership::owner(actor, workspace.id, now);

        let audit = AuditEvent::new(AuditAction::WorkspaceCreate, workspace.id, now)
            .in_workspace(workspace.id)
            .by(actor);
        let entry = self.store.create_workspace(&workspace, &owner, audit).await?;
        self.emit(&entry);
        Ok(workspace)
    }

    /// Workspaces the caller is an active member of. No workspace context needed.
    pub async fn list_workspaces(&self, ctx: &RequestContext) -> ServiceResult<Vec<WorkspaceMembership>> {
        let actor = ctx.actor()?;
        Ok(self.store.list_workspaces_for(actor).await?)
    }

    /// Validate the requested workspace and echo it back with the caller's role.
    pub async fn switch_workspace(&self, ctx: &RequestContext) -> ServiceResult<WorkspaceMembership> {
        let (actor, workspace_id) = ctx.target()?;
        let workspace = self.store.find_workspace(workspace_id).await?;
        let membership = self.store.find_membership(actor, workspace_id).await?;
        let live = workspace.as_ref().is_some_and(|w| !w.is_deleted());

        let access = authorize_switch(actor, workspace_id, live, membership.as_ref())?;
        let workspace = workspace.ok_or_else(AccessError::workspace_not_found)?;
        Ok(WorkspaceMembership {
            id: workspace.id,
            name: workspace.name,
            role: access.role,
        })
    }

    /// Soft delete. Only the OWNER of that exact workspace.
    pub async fn delete_workspace(&self, ctx: &RequestContext, workspace_id: WorkspaceId) -> ServiceResult<Workspace> {
        let actor = ctx.actor()?;
        let workspace = self.store.find_workspace(workspace_id).await?;
        let membership = self.store.find_membership(actor, workspace_id).await?;
        let live = workspace.as_ref().is_some_and(|w| !w.is_deleted());

        authorize_delete(actor, workspace_id, live, membership.as_ref())?;
        let mut workspace = workspace.ok_or_else(AccessError::workspace_not_found)?;

        let now = self.now();
        let audit = AuditEvent::new(AuditAction::WorkspaceSoftDelete, workspace_id, now)
            .in_workspace(workspace_id)
            .by(actor);
        let entry = self.store.soft_delete_workspace(workspace_id, now, audit).await?;
        self.emit(&entry);

        workspace.soft_delete(now);
        tracing::info!(%workspace_id, user_id = %actor, "workspace soft-deleted");
        Ok(workspace)
    }
}
