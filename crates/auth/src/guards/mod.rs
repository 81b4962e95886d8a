//! Resource guards: existence and workspace scoping first, then the engine.
//!
//! Guards take already-loaded rows. A resource that is absent, soft-deleted,
//! or belongs to another workspace is reported as `NotFound` before any role
//! check runs, so the caller never learns about resources outside its tenant.

pub mod expense;
pub mod member;
pub mod note;
pub mod workspace;

use worksphere_core::{UserId, WorkspaceId};

use crate::authorize::{decide, explain, AccessRequest, Decision};
use crate::error::AccessError;
use crate::permissions::Visibility;
use crate::principal::WorkspaceAccess;

/// A row that lives inside exactly one workspace and has a creator.
pub trait WorkspaceResource {
    fn workspace_id(&self) -> WorkspaceId;
    fn owner_id(&self) -> UserId;
    fn is_deleted(&self) -> bool;
}

pub trait NoteResource: WorkspaceResource {
    fn visibility(&self) -> Visibility;
}

impl<T: WorkspaceResource + ?Sized> WorkspaceResource for &T {
    fn workspace_id(&self) -> WorkspaceId {
        (**self).workspace_id()
    }
    fn owner_id(&self) -> UserId {
        (**self).owner_id()
    }
    fn is_deleted(&self) -> bool {
        (**self).is_deleted()
    }
}

impl<T: NoteResource + ?Sized> NoteResource for &T {
    fn visibility(&self) -> Visibility {
        (**self).visibility()
    }
}

pub(crate) fn locate<'a, R: WorkspaceResource>(
    access: &WorkspaceAccess,
    resource: Option<&'a R>,
    kind: &'static str,
) -> Result<&'a R, AccessError> {
    resource
        .filter(|r| r.workspace_id() == access.workspace_id && !r.is_deleted())
        .ok_or(AccessError::NotFound(kind))
}

pub(crate) fn enforce(request: AccessRequest, access: &WorkspaceAccess) -> Result<(), AccessError> {
    match decide(&request) {
        Decision::Allow => Ok(()),
        Decision::Deny(reason) => {
            tracing::debug!(
                user_id = %access.user_id,
                workspace_id = %access.workspace_id,
                role = %access.role,
                action = %request.action,
                explanation = %explain(&request).reason,
                "access denied"
            );
            Err(AccessError::from(reason))
        }
    }
}
