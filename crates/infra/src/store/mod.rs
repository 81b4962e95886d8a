//! Persistence boundary for workspace data.
//!
//! Every mutating method takes the audit event(s) describing it and persists
//! them in the same transaction as the change: a mutation is never stored
//! without its audit entry, and an entry never without its mutation.

pub mod in_memory;
#[cfg(feature = "postgres")]
pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use worksphere_auth::{LifecycleError, Membership, MembershipState, Role};
use worksphere_core::{ExpenseId, NoteId, UserId, WorkspaceId};
use worksphere_events::{AuditEvent, AuditLogEntry};
use worksphere_workspace::{Expense, Note, User, Workspace, WorkspaceMembership};

pub use in_memory::InMemoryWorkspaceStore;
#[cfg(feature = "postgres")]
pub use postgres::PostgresWorkspaceStore;

#[derive(Debug, Error)]
pub enum StoreError {
    /// Uniqueness violation, e.g. an email that is already registered.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Another writer changed the row first, or the transaction could not be
    /// serialized. Not something the client can resolve.
    #[error("concurrent write: {0}")]
    ConcurrentWrite(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("store backend error: {0}")]
    Backend(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// A freshly signed-up user with their first workspace.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub user: User,
    pub workspace: Workspace,
    pub owner: Membership,
}

/// A membership row joined with the member's email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberRecord {
    #[serde(flatten)]
    pub membership: Membership,
    pub email: String,
}

/// An invitation to upsert on `(user_id, workspace_id)`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Invitation {
    pub user_id: UserId,
    pub workspace_id: WorkspaceId,
    pub role: Role,
    pub at: DateTime<Utc>,
}

#[async_trait]
pub trait WorkspaceStore: Send + Sync {
    // ── users ───────────────────────────────────────────────────────────────
    async fn find_user(&self, id: UserId) -> StoreResult<Option<User>>;

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    /// User, workspace and OWNER membership in one transaction.
    /// A taken email is `Conflict`.
    async fn create_account(&self, account: &NewAccount, audit: Vec<AuditEvent>)
    -> StoreResult<Vec<AuditLogEntry>>;

    // ── workspaces ──────────────────────────────────────────────────────────
    async fn find_workspace(&self, id: WorkspaceId) -> StoreResult<Option<Workspace>>;

    async fn create_workspace(
        &self,
        workspace: &Workspace,
        owner: &Membership,
        audit: AuditEvent,
    ) -> StoreResult<AuditLogEntry>;

    /// `NotFound` if the workspace is absent or already deleted.
    async fn soft_delete_workspace(
        &self,
        id: WorkspaceId,
        at: DateTime<Utc>,
        audit: AuditEvent,
    ) -> StoreResult<AuditLogEntry>;

    /// Live workspaces in which `user` holds an active membership, oldest membership first.
    async fn list_workspaces_for(&self, user: UserId) -> StoreResult<Vec<WorkspaceMembership>>;

    // ── memberships ─────────────────────────────────────────────────────────
    async fn find_membership(&self, user: UserId, workspace: WorkspaceId) -> StoreResult<Option<Membership>>;

    /// Every row of the workspace, in any state, oldest first.
    async fn list_members(&self, workspace: WorkspaceId) -> StoreResult<Vec<MemberRecord>>;

    /// Atomic insert-or-reset keyed on `(user_id, workspace_id)`. The audit
    /// event's `entity_id` is set to the resulting membership id.
    /// An existing OWNER row is never touched.
    async fn upsert_invitation(
        &self,
        invitation: Invitation,
        audit: AuditEvent,
    ) -> StoreResult<(Membership, AuditLogEntry)>;

    /// Compare-and-set: writes `updated` only if the stored row is still in
    /// state `from`, otherwise `ConcurrentWrite`.
    async fn transition_membership(
        &self,
        updated: &Membership,
        from: MembershipState,
        audit: AuditEvent,
    ) -> StoreResult<AuditLogEntry>;

    // ── expenses ────────────────────────────────────────────────────────────
    async fn find_expense(&self, id: ExpenseId) -> StoreResult<Option<Expense>>;

    /// Live expenses, newest `occurred_at` first.
    async fn list_expenses(&self, workspace: WorkspaceId) -> StoreResult<Vec<Expense>>;

    async fn insert_expense(&self, expense: &Expense, audit: AuditEvent) -> StoreResult<AuditLogEntry>;

    /// Overwrite a live row (including a soft delete). `NotFound` if the row
    /// was deleted in the meantime.
    async fn update_expense(&self, expense: &Expense, audit: AuditEvent) -> StoreResult<AuditLogEntry>;

    // ── notes ───────────────────────────────────────────────────────────────
    async fn find_note(&self, id: NoteId) -> StoreResult<Option<Note>>;

    /// Live notes, newest first. Visibility filtering is the caller's job.
    async fn list_notes(&self, workspace: WorkspaceId) -> StoreResult<Vec<Note>>;

    async fn insert_note(&self, note: &Note, audit: AuditEvent) -> StoreResult<AuditLogEntry>;

    async fn update_note(&self, note: &Note, audit: AuditEvent) -> StoreResult<AuditLogEntry>;
}
