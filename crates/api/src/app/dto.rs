//! Request/response bodies. JSON field names are camelCase.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use worksphere_auth::{Membership, MembershipState, MembershipStatus, Role, Visibility};
use worksphere_core::{ExpenseId, MembershipId, NoteId, UserId, WorkspaceId};
use worksphere_infra::{ExpenseDraft, MemberRecord, NoteDraft, NoteEdit};
use worksphere_workspace::{Expense, ExpensePatch, Note, User, Workspace, WorkspaceMembership};

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub workspace_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateWorkspaceRequest {
    pub name: String,
}

/// Missing fields default to empty values; the role and email are checked
/// by the service once the caller is allowed to invite.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct InviteRequest {
    pub email: String,
    pub role: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DecisionRequest {
    pub user_id: String,
    pub decision: String,
}

/// Missing fields default to empty values so that content validation runs
/// after authorization, like every other input check.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CreateExpenseRequest {
    pub title: String,
    pub amount_cents: i64,
    pub currency: Option<String>,
    /// Defaults to the time of the request.
    pub occurred_at: Option<DateTime<Utc>>,
}

impl CreateExpenseRequest {
    pub fn into_draft(self, now: DateTime<Utc>) -> ExpenseDraft {
        ExpenseDraft {
            title: self.title,
            amount_cents: self.amount_cents,
            currency: self.currency,
            occurred_at: self.occurred_at.unwrap_or(now),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateExpenseRequest {
    pub title: Option<String>,
    pub amount_cents: Option<i64>,
    pub currency: Option<String>,
    pub occurred_at: Option<DateTime<Utc>>,
}

impl From<UpdateExpenseRequest> for ExpensePatch {
    fn from(value: UpdateExpenseRequest) -> Self {
        ExpensePatch {
            title: value.title,
            amount_cents: value.amount_cents,
            currency: value.currency,
            occurred_at: value.occurred_at,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateNoteRequest {
    pub title: String,
    pub content: String,
    pub visibility: Option<String>,
}

impl From<CreateNoteRequest> for NoteDraft {
    fn from(value: CreateNoteRequest) -> Self {
        NoteDraft {
            title: value.title,
            content: value.content,
            visibility: value.visibility,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateNoteRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub visibility: Option<String>,
}

impl From<UpdateNoteRequest> for NoteEdit {
    fn from(value: UpdateNoteRequest) -> Self {
        NoteEdit {
            title: value.title,
            content: value.content,
            visibility: value.visibility,
        }
    }
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct UserView {
    pub id: UserId,
    pub email: String,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceView {
    pub id: WorkspaceId,
    pub name: String,
    pub owner_id: UserId,
    pub created_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl From<Workspace> for WorkspaceView {
    fn from(ws: Workspace) -> Self {
        Self {
            id: ws.id,
            name: ws.name,
            owner_id: ws.owner_id,
            created_at: ws.created_at,
            deleted_at: ws.deleted_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MembershipView {
    pub id: WorkspaceId,
    pub name: String,
    pub role: Role,
}

impl From<WorkspaceMembership> for MembershipView {
    fn from(m: WorkspaceMembership) -> Self {
        Self {
            id: m.id,
            name: m.name,
            role: m.role,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberView {
    pub id: MembershipId,
    pub user_id: UserId,
    pub workspace_id: WorkspaceId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub role: Role,
    pub status: MembershipStatus,
    pub state: MembershipState,
    pub removed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Membership> for MemberView {
    fn from(m: Membership) -> Self {
        Self {
            id: m.id,
            user_id: m.user_id,
            workspace_id: m.workspace_id,
            email: None,
            role: m.role,
            status: m.status,
            state: m.state(),
            removed_at: m.removed_at,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

impl From<MemberRecord> for MemberView {
    fn from(record: MemberRecord) -> Self {
        Self {
            email: Some(record.email),
            ..Self::from(record.membership)
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseView {
    pub id: ExpenseId,
    pub workspace_id: WorkspaceId,
    pub user_id: UserId,
    pub title: String,
    pub amount_cents: i64,
    pub currency: String,
    pub occurred_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl From<Expense> for ExpenseView {
    fn from(e: Expense) -> Self {
        Self {
            id: e.id,
            workspace_id: e.workspace_id,
            user_id: e.user_id,
            amount_cents: e.amount.amount_minor(),
            currency: e.amount.currency().to_string(),
            title: e.title,
            occurred_at: e.occurred_at,
            created_at: e.created_at,
            updated_at: e.updated_at,
            deleted_at: e.deleted_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteView {
    pub id: NoteId,
    pub workspace_id: WorkspaceId,
    pub user_id: UserId,
    pub title: String,
    pub content: String,
    pub visibility: Visibility,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl From<Note> for NoteView {
    fn from(n: Note) -> Self {
        Self {
            id: n.id,
            workspace_id: n.workspace_id,
            user_id: n.user_id,
            title: n.title,
            content: n.content,
            visibility: n.visibility,
            created_at: n.created_at,
            updated_at: n.updated_at,
            deleted_at: n.deleted_at,
        }
    }
}

/// Anonymous view of a PUBLIC note: no author or workspace ids.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicNoteView {
    pub id: NoteId,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl From<Note> for PublicNoteView {
    fn from(n: Note) -> Self {
        Self {
            id: n.id,
            title: n.title,
            content: n.content,
            created_at: n.created_at,
        }
    }
}
