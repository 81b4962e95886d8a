use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use worksphere_auth::{Membership, MembershipState};
use worksphere_core::{ExpenseId, NoteId, UserId, WorkspaceId};
use worksphere_events::{AuditEvent, AuditLogEntry};
use worksphere_workspace::{Expense, Note, User, Workspace, WorkspaceMembership};

use super::{Invitation, MemberRecord, NewAccount, StoreError, StoreResult, WorkspaceStore};

#[derive(Debug, Default)]
struct State {
    users: HashMap<UserId, User>,
    emails: HashMap<String, UserId>,
    workspaces: HashMap<WorkspaceId, Workspace>,
    memberships: HashMap<(UserId, WorkspaceId), Membership>,
    expenses: HashMap<ExpenseId, Expense>,
    notes: HashMap<NoteId, Note>,
    audit: Vec<AuditLogEntry>,
}

impl State {
    fn append(&mut self, event: AuditEvent) -> AuditLogEntry {
        let entry = AuditLogEntry::record(event);
        self.audit.push(entry.clone());
        entry
    }
}

/// In-memory store for tests and local development.
///
/// A single lock guards every table and the audit log, so each write method
/// is one atomic step.
#[derive(Debug, Default)]
pub struct InMemoryWorkspaceStore {
    state: RwLock<State>,
}

impl InMemoryWorkspaceStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, State>> {
        self.state
            .read()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, State>> {
        self.state
            .write()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))
    }

    /// Every committed audit entry, in commit order.
    pub fn audit_entries(&self) -> StoreResult<Vec<AuditLogEntry>> {
        Ok(self.read()?.audit.clone())
    }
}

#[async_trait]
impl WorkspaceStore for InMemoryWorkspaceStore {
    async fn find_user(&self, id: UserId) -> StoreResult<Option<User>> {
        Ok(self.read()?.users.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let state = self.read()?;
        Ok(state.emails.get(email).and_then(|id| state.users.get(id)).cloned())
    }

    async fn create_account(
        &self,
        account: &NewAccount,
        audit: Vec<AuditEvent>,
    ) -> StoreResult<Vec<AuditLogEntry>> {
        let mut state = self.write()?;
        if state.emails.contains_key(&account.user.email) {
            return Err(StoreError::Conflict("email already registered".to_string()));
        }

        let user = account.user.clone();
        state.emails.insert(user.email.clone(), user.id);
        state.users.insert(user.id, user);
        state.workspaces.insert(account.workspace.id, account.workspace.clone());
        state.memberships.insert(
            (account.owner.user_id, account.owner.workspace_id),
            account.owner.clone(),
        );
        Ok(audit.into_iter().map(|e| state.append(e)).collect())
    }

    async fn find_workspace(&self, id: WorkspaceId) -> StoreResult<Option<Workspace>> {
        Ok(self.read()?.workspaces.get(&id).cloned())
    }

    async fn create_workspace(
        &self,
        workspace: &Workspace,
        owner: &Membership,
        audit: AuditEvent,
    ) -> StoreResult<AuditLogEntry> {
        let mut state = self.write()?;
        if state.workspaces.contains_key(&workspace.id) {
            return Err(StoreError::Conflict("workspace already exists".to_string()));
        }
        state.workspaces.insert(workspace.id, workspace.clone());
        state.memberships.insert((owner.user_id, owner.workspace_id), owner.clone());
        Ok(state.append(audit))
    }

    async fn soft_delete_workspace(
        &self,
        id: WorkspaceId,
        at: DateTime<Utc>,
        audit: AuditEvent,
    ) -> StoreResult<AuditLogEntry> {
        let mut state = self.write()?;
        match state.workspaces.get_mut(&id) {
            Some(ws) if !ws.is_deleted() => ws.soft_delete(at),
            _ => return Err(StoreError::NotFound("workspace")),
        }
        Ok(state.append(audit))
    }

    async fn list_workspaces_for(&self, user: UserId) -> StoreResult<Vec<WorkspaceMembership>> {
        let state = self.read()?;
        let mut rows: Vec<(&Membership, &Workspace)> = state
            .memberships
            .values()
            .filter(|m| m.user_id == user && m.grants_access())
            .filter_map(|m| state.workspaces.get(&m.workspace_id).map(|w| (m, w)))
            .filter(|(_, w)| !w.is_deleted())
            .collect();
        rows.sort_by_key(|(m, _)| (m.created_at, m.id));
        Ok(rows
            .into_iter()
            .map(|(m, w)| WorkspaceMembership {
                id: w.id,
                name: w.name.clone(),
                role: m.role,
            })
            .collect())
    }

    async fn find_membership(&self, user: UserId, workspace: WorkspaceId) -> StoreResult<Option<Membership>> {
        Ok(self.read()?.memberships.get(&(user, workspace)).cloned())
    }

    async fn list_members(&self, workspace: WorkspaceId) -> StoreResult<Vec<MemberRecord>> {
        let state = self.read()?;
        let mut rows: Vec<MemberRecord> = state
            .memberships
            .values()
            .filter(|m| m.workspace_id == workspace)
            .map(|m| MemberRecord {
                membership: m.clone(),
                email: state.users.get(&m.user_id).map(|u| u.email.clone()).unwrap_or_default(),
            })
            .collect();
        rows.sort_by_key(|r| (r.membership.created_at, r.membership.id));
        Ok(rows)
    }

    async fn upsert_invitation(
        &self,
        invitation: Invitation,
        mut audit: AuditEvent,
    ) -> StoreResult<(Membership, AuditLogEntry)> {
        let mut state = self.write()?;
        let key = (invitation.user_id, invitation.workspace_id);
        let existing = state.memberships.get(&key).cloned();
        let row = Membership::invite(
            existing,
            invitation.user_id,
            invitation.workspace_id,
            invitation.role,
            invitation.at,
        )?;
        state.memberships.insert(key, row.clone());

        audit.entity_id = row.id.into();
        let entry = state.append(audit);
        Ok((row, entry))
    }

    async fn transition_membership(
        &self,
        updated: &Membership,
        from: MembershipState,
        audit: AuditEvent,
    ) -> StoreResult<AuditLogEntry> {
        let mut state = self.write()?;
        let key = (updated.user_id, updated.workspace_id);
        match state.memberships.get(&key) {
            None => return Err(StoreError::NotFound("member")),
            Some(current) if current.id != updated.id || current.state() != from || current.is_owner() => {
                return Err(StoreError::ConcurrentWrite("membership changed concurrently".to_string()));
            }
            Some(_) => {}
        }
        state.memberships.insert(key, updated.clone());
        Ok(state.append(audit))
    }

    async fn find_expense(&self, id: ExpenseId) -> StoreResult<Option<Expense>> {
        Ok(self.read()?.expenses.get(&id).cloned())
    }

    async fn list_expenses(&self, workspace: WorkspaceId) -> StoreResult<Vec<Expense>> {
        let state = self.read()?;
        let mut rows: Vec<Expense> = state
            .expenses
            .values()
            .filter(|e| e.workspace_id == workspace && e.deleted_at.is_none())
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.occurred_at.cmp(&a.occurred_at).then(b.id.cmp(&a.id)));
        Ok(rows)
    }

    async fn insert_expense(&self, expense: &Expense, audit: AuditEvent) -> StoreResult<AuditLogEntry> {
        let mut state = self.write()?;
        state.expenses.insert(expense.id, expense.clone());
        Ok(state.append(audit))
    }

    async fn update_expense(&self, expense: &Expense, audit: AuditEvent) -> StoreResult<AuditLogEntry> {
        let mut state = self.write()?;
        match state.expenses.get_mut(&expense.id) {
            Some(row) if row.deleted_at.is_none() && row.workspace_id == expense.workspace_id => {
                *row = expense.clone();
            }
            _ => return Err(StoreError::NotFound("expense")),
        }
        Ok(state.append(audit))
    }

    async fn find_note(&self, id: NoteId) -> StoreResult<Option<Note>> {
        Ok(self.read()?.notes.get(&id).cloned())
    }

    async fn list_notes(&self, workspace: WorkspaceId) -> StoreResult<Vec<Note>> {
        let state = self.read()?;
        let mut rows: Vec<Note> = state
            .notes
            .values()
            .filter(|n| n.workspace_id == workspace && n.deleted_at.is_none())
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(rows)
    }

    async fn insert_note(&self, note: &Note, audit: AuditEvent) -> StoreResult<AuditLogEntry> {
        let mut state = self.write()?;
        state.notes.insert(note.id, note.clone());
        Ok(state.append(audit))
    }

    async fn update_note(&self, note: &Note, audit: AuditEvent) -> StoreResult<AuditLogEntry> {
        let mut state = self.write()?;
        match state.notes.get_mut(&note.id) {
            Some(row) if row.deleted_at.is_none() && row.workspace_id == note.workspace_id => {
                *row = note.clone();
            }
            _ => return Err(StoreError::NotFound("note")),
        }
        Ok(state.append(audit))
    }
}
