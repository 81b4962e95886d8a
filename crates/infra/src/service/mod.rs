//! Application service: every workspace operation, end to end.
//!
//! ## Request Flow
//!
//! ```text
//! RequestContext (user?, workspace selector)
//!   ↓
//! 1. Authentication present            → UNAUTHENTICATED
//!   ↓
//! 2. Active workspace resolvable       → NO_WORKSPACE / NOT_FOUND
//!   ↓
//! 3. Resource exists in that workspace → NOT_FOUND
//!   ↓
//! 4. Authorization decision            → FORBIDDEN
//!   ↓
//! 5. Input validation                  → BAD_REQUEST
//!   ↓
//! 6. Mutation + audit entry, one store transaction
//!   ↓
//! 7. Committed audit entry forwarded to the `AuditSink`
//! ```
//!
//! Steps 1-4 are the `worksphere-auth` guards fed with rows loaded here. The
//! service holds no per-request state; the active workspace is always taken
//! from the explicit [`RequestContext`].

mod accounts;
mod expenses;
mod members;
mod notes;
mod workspaces;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;

use worksphere_auth::{resolve_access, AccessError, ErrorCode, LifecycleError, RequestContext, WorkspaceAccess};
use worksphere_core::DomainError;
use worksphere_events::{AuditLogEntry, AuditSink, TracingAuditSink};

use crate::password::{Argon2Hasher, PasswordHashError, PasswordHasher};
use crate::store::{InMemoryWorkspaceStore, StoreError, WorkspaceStore};

pub use accounts::Account;
pub use expenses::ExpenseDraft;
pub use notes::{NoteDraft, NoteEdit};

#[derive(Debug, Error)]
pub enum ServiceError {
    /// A terminal, client-visible denial or input failure.
    #[error(transparent)]
    Access(#[from] AccessError),

    /// Persistence failed for reasons the caller cannot act on.
    #[error("store failure: {0}")]
    Store(StoreError),

    #[error("credential processing failed")]
    Credentials(#[from] PasswordHashError),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl ServiceError {
    pub fn code(&self) -> ErrorCode {
        match self {
            ServiceError::Access(e) => e.code(),
            ServiceError::Store(_) | ServiceError::Credentials(_) => ErrorCode::Internal,
        }
    }

    /// Message safe to return to the client. Internal failures stay generic.
    pub fn public_message(&self) -> String {
        match self {
            ServiceError::Access(e) => e.to_string(),
            ServiceError::Store(_) | ServiceError::Credentials(_) => "internal server error".to_string(),
        }
    }
}

impl From<StoreError> for ServiceError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::Conflict(msg) => ServiceError::Access(AccessError::Conflict(msg)),
            // a lost compare-and-set is the server's problem, not a client conflict
            err @ StoreError::ConcurrentWrite(_) => ServiceError::Store(err),
            StoreError::NotFound(kind) => ServiceError::Access(AccessError::NotFound(kind)),
            StoreError::Lifecycle(err) => ServiceError::Access(err.into()),
            other => ServiceError::Store(other),
        }
    }
}

impl From<LifecycleError> for ServiceError {
    fn from(value: LifecycleError) -> Self {
        ServiceError::Access(value.into())
    }
}

impl From<DomainError> for ServiceError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::Validation(msg) | DomainError::InvalidId(msg) => {
                ServiceError::Access(AccessError::BadRequest(msg))
            }
        }
    }
}

/// Entry point for every workspace operation.
///
/// Cheap to clone; all collaborators are shared.
#[derive(Clone)]
pub struct WorkspaceService {
    store: Arc<dyn WorkspaceStore>,
    hasher: Arc<dyn PasswordHasher>,
    audit: Arc<dyn AuditSink>,
}

impl WorkspaceService {
    pub fn new(store: Arc<dyn WorkspaceStore>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self {
            store,
            hasher,
            audit: Arc::new(TracingAuditSink),
        }
    }

    /// In-memory store with production hashing parameters (dev/test wiring).
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryWorkspaceStore::new()), Arc::new(Argon2Hasher::default()))
    }

    pub fn with_audit_sink(mut self, sink: Arc<dyn AuditSink>) -> Self {
        self.audit = sink;
        self
    }

    pub fn store(&self) -> &Arc<dyn WorkspaceStore> {
        &self.store
    }

    /// Resolve the caller's active workspace: steps 1 and 2 of every
    /// workspace-scoped operation.
    pub async fn active_workspace(&self, ctx: &RequestContext) -> ServiceResult<WorkspaceAccess> {
        let (actor, workspace_id) = ctx.target()?;
        let workspace = self.store.find_workspace(workspace_id).await?;
        let live = workspace.as_ref().is_some_and(|w| !w.is_deleted());
        let membership = self.store.find_membership(actor, workspace_id).await?;
        Ok(resolve_access(actor, workspace_id, live, membership.as_ref())?)
    }

    fn emit(&self, entry: &AuditLogEntry) {
        self.audit.emit(entry);
    }

    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

impl core::fmt::Debug for WorkspaceService {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("WorkspaceService").finish_non_exhaustive()
    }
}
