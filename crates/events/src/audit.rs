use core::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use uuid::Uuid;

use worksphere_core::{UserId, WorkspaceId};

use crate::Event;

// ─────────────────────────────────────────────────────────────────────────────
// Tags
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    UserSignup,
    WorkspaceCreate,
    WorkspaceSoftDelete,
    MemberInvite,
    MemberApprove,
    MemberReject,
    MemberRemove,
    ExpenseCreate,
    ExpenseUpdate,
    ExpenseSoftDelete,
    NoteCreate,
    NoteUpdate,
    NoteDelete,
}

impl AuditAction {
    pub const ALL: [AuditAction; 13] = [
        AuditAction::UserSignup,
        AuditAction::WorkspaceCreate,
        AuditAction::WorkspaceSoftDelete,
        AuditAction::MemberInvite,
        AuditAction::MemberApprove,
        AuditAction::MemberReject,
        AuditAction::MemberRemove,
        AuditAction::ExpenseCreate,
        AuditAction::ExpenseUpdate,
        AuditAction::ExpenseSoftDelete,
        AuditAction::NoteCreate,
        AuditAction::NoteUpdate,
        AuditAction::NoteDelete,
    ];

    pub fn tag(self) -> &'static str {
        match self {
            AuditAction::UserSignup => "USER_SIGNUP",
            AuditAction::WorkspaceCreate => "WORKSPACE_CREATE",
            AuditAction::WorkspaceSoftDelete => "WORKSPACE_SOFT_DELETE",
            AuditAction::MemberInvite => "MEMBER_INVITE",
            AuditAction::MemberApprove => "MEMBER_APPROVE",
            AuditAction::MemberReject => "MEMBER_REJECT",
            AuditAction::MemberRemove => "MEMBER_REMOVE",
            AuditAction::ExpenseCreate => "EXPENSE_CREATE",
            AuditAction::ExpenseUpdate => "EXPENSE_UPDATE",
            AuditAction::ExpenseSoftDelete => "EXPENSE_SOFT_DELETE",
            AuditAction::NoteCreate => "NOTE_CREATE",
            AuditAction::NoteUpdate => "NOTE_UPDATE",
            AuditAction::NoteDelete => "NOTE_DELETE",
        }
    }

    /// Entity type every action of this tag is recorded against.
    pub fn entity(self) -> EntityKind {
        match self {
            AuditAction::UserSignup => EntityKind::User,
            AuditAction::WorkspaceCreate | AuditAction::WorkspaceSoftDelete => EntityKind::Workspace,
            AuditAction::MemberInvite
            | AuditAction::MemberApprove
            | AuditAction::MemberReject
            | AuditAction::MemberRemove => EntityKind::WorkspaceMember,
            AuditAction::ExpenseCreate | AuditAction::ExpenseUpdate | AuditAction::ExpenseSoftDelete => {
                EntityKind::Expense
            }
            AuditAction::NoteCreate | AuditAction::NoteUpdate | AuditAction::NoteDelete => EntityKind::Note,
        }
    }
}

impl core::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.tag())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown audit action '{0}'")]
pub struct UnknownAuditAction(pub String);

impl FromStr for AuditAction {
    type Err = UnknownAuditAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AuditAction::ALL
            .into_iter()
            .find(|a| a.tag() == s)
            .ok_or_else(|| UnknownAuditAction(s.to_string()))
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    User,
    Workspace,
    WorkspaceMember,
    Expense,
    Note,
}

impl EntityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::User => "User",
            EntityKind::Workspace => "Workspace",
            EntityKind::WorkspaceMember => "WorkspaceMember",
            EntityKind::Expense => "Expense",
            EntityKind::Note => "Note",
        }
    }
}

impl core::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Event / Entry
// ─────────────────────────────────────────────────────────────────────────────

/// What happened, by whom, to which entity. Built by the service, persisted
/// by the store in the same transaction as the mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEvent {
    pub workspace_id: Option<WorkspaceId>,
    pub user_id: Option<UserId>,
    pub action: AuditAction,
    pub entity: EntityKind,
    pub entity_id: Uuid,
    pub meta: Option<JsonValue>,
    pub occurred_at: DateTime<Utc>,
}

impl AuditEvent {
    pub fn new(action: AuditAction, entity_id: impl Into<Uuid>, at: DateTime<Utc>) -> Self {
        Self {
            workspace_id: None,
            user_id: None,
            action,
            entity: action.entity(),
            entity_id: entity_id.into(),
            meta: None,
            occurred_at: at,
        }
    }

    pub fn in_workspace(mut self, workspace_id: WorkspaceId) -> Self {
        self.workspace_id = Some(workspace_id);
        self
    }

    pub fn by(mut self, user_id: UserId) -> Self {
        self.user_id = Some(user_id);
        self
    }

    pub fn with_meta(mut self, meta: JsonValue) -> Self {
        self.meta = Some(meta);
        self
    }
}

impl Event for AuditEvent {
    fn event_type(&self) -> &'static str {
        self.action.tag()
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }
}

/// Append-only audit row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditLogEntry {
    pub id: Uuid,
    #[serde(flatten)]
    pub event: AuditEvent,
}

impl AuditLogEntry {
    pub fn record(event: AuditEvent) -> Self {
        Self {
            id: Uuid::now_v7(),
            event,
        }
    }

    pub fn action(&self) -> AuditAction {
        self.event.action
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.event.occurred_at
    }
}
