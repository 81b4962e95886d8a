//! Postgres-backed workspace store.
//!
//! Every mutation runs in one transaction together with its audit insert.
//! Schema: `migrations/0001_workspaces.sql`.
//!
//! ## Error Mapping
//!
//! | SQLx Error | PostgreSQL Error Code | StoreError |
//! |------------|----------------------|------------|
//! | Database (unique violation) | `23505` | `Conflict` |
//! | Database (serialization failure) | `40001` | `ConcurrentWrite` |
//! | Database (other) | Any other | `Backend` |
//! | PoolClosed / PoolTimedOut | N/A | `Unavailable` |
//! | Other | N/A | `Backend` |

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Postgres, Row, Transaction};
use tracing::instrument;
use uuid::Uuid;

use worksphere_auth::{Membership, MembershipState, MembershipStatus, Role, Visibility};
use worksphere_core::{ExpenseId, Money, NoteId, UserId, WorkspaceId};
use worksphere_events::{AuditEvent, AuditLogEntry};
use worksphere_workspace::{Expense, Note, User, Workspace, WorkspaceMembership};

use super::{Invitation, MemberRecord, NewAccount, StoreError, StoreResult, WorkspaceStore};

const SCHEMA: &str = include_str!("../../migrations/0001_workspaces.sql");

const MEMBER_COLUMNS: &str = "id, user_id, workspace_id, role, status, removed_at, created_at, updated_at";
const EXPENSE_COLUMNS: &str =
    "id, workspace_id, user_id, title, amount_cents, currency, occurred_at, created_at, updated_at, deleted_at";
const NOTE_COLUMNS: &str = "id, workspace_id, user_id, title, content, visibility, created_at, updated_at, deleted_at";

/// Postgres implementation of [`WorkspaceStore`].
///
/// The `(user_id, workspace_id)` primary key on `workspace_members` is the
/// only concurrency control for invitations: upserts go through
/// `INSERT .. ON CONFLICT DO UPDATE`, never read-then-write.
#[derive(Debug, Clone)]
pub struct PostgresWorkspaceStore {
    pool: Arc<PgPool>,
}

impl PostgresWorkspaceStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool: Arc::new(pool) }
    }

    /// Create missing tables and indexes. Idempotent.
    pub async fn apply_schema(&self) -> StoreResult<()> {
        sqlx::raw_sql(SCHEMA)
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("apply_schema", e))?;
        Ok(())
    }

    async fn begin(&self) -> StoreResult<Transaction<'static, Postgres>> {
        self.pool.begin().await.map_err(|e| map_sqlx_error("begin_transaction", e))
    }
}

async fn commit(tx: Transaction<'static, Postgres>) -> StoreResult<()> {
    tx.commit().await.map_err(|e| map_sqlx_error("commit_transaction", e))
}

async fn insert_audit(tx: &mut Transaction<'static, Postgres>, event: AuditEvent) -> StoreResult<AuditLogEntry> {
    let entry = AuditLogEntry::record(event);
    let e = &entry.event;
    sqlx::query(
        r#"
        INSERT INTO audit_logs (id, workspace_id, user_id, action, entity, entity_id, meta, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        "#,
    )
    .bind(entry.id)
    .bind(e.workspace_id.map(Uuid::from))
    .bind(e.user_id.map(Uuid::from))
    .bind(e.action.tag())
    .bind(e.entity.as_str())
    .bind(e.entity_id)
    .bind(&e.meta)
    .bind(e.occurred_at)
    .execute(&mut **tx)
    .await
    .map_err(|err| map_sqlx_error("insert_audit", err))?;
    Ok(entry)
}

#[async_trait]
impl WorkspaceStore for PostgresWorkspaceStore {
    #[instrument(skip(self), err)]
    async fn find_user(&self, id: UserId) -> StoreResult<Option<User>> {
        let row = sqlx::query("SELECT id, email, password_hash, created_at FROM users WHERE id = $1")
            .bind(Uuid::from(id))
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_user", e))?;
        row.as_ref().map(user_from_row).transpose()
    }

    #[instrument(skip(self, email), err)]
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let row = sqlx::query("SELECT id, email, password_hash, created_at FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_user_by_email", e))?;
        row.as_ref().map(user_from_row).transpose()
    }

    #[instrument(skip_all, fields(user_id = %account.user.id, workspace_id = %account.workspace.id), err)]
    async fn create_account(
        &self,
        account: &NewAccount,
        audit: Vec<AuditEvent>,
    ) -> StoreResult<Vec<AuditLogEntry>> {
        let mut tx = self.begin().await?;

        sqlx::query("INSERT INTO users (id, email, password_hash, created_at) VALUES ($1, $2, $3, $4)")
            .bind(Uuid::from(account.user.id))
            .bind(&account.user.email)
            .bind(&account.user.password_hash)
            .bind(account.user.created_at)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    StoreError::Conflict("email already registered".to_string())
                } else {
                    map_sqlx_error("insert_user", e)
                }
            })?;

        insert_workspace(&mut tx, &account.workspace).await?;
        insert_membership(&mut tx, &account.owner).await?;

        let mut entries = Vec::with_capacity(audit.len());
        for event in audit {
            entries.push(insert_audit(&mut tx, event).await?);
        }
        commit(tx).await?;
        Ok(entries)
    }

    #[instrument(skip(self), err)]
    async fn find_workspace(&self, id: WorkspaceId) -> StoreResult<Option<Workspace>> {
        let row = sqlx::query("SELECT id, name, owner_id, created_at, deleted_at FROM workspaces WHERE id = $1")
            .bind(Uuid::from(id))
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_workspace", e))?;
        row.as_ref().map(workspace_from_row).transpose()
    }

    #[instrument(skip_all, fields(workspace_id = %workspace.id), err)]
    async fn create_workspace(
        &self,
        workspace: &Workspace,
        owner: &Membership,
        audit: AuditEvent,
    ) -> StoreResult<AuditLogEntry> {
        let mut tx = self.begin().await?;
        insert_workspace(&mut tx, workspace).await?;
        insert_membership(&mut tx, owner).await?;
        let entry = insert_audit(&mut tx, audit).await?;
        commit(tx).await?;
        Ok(entry)
    }

    #[instrument(skip(self, audit), err)]
    async fn soft_delete_workspace(
        &self,
        id: WorkspaceId,
        at: DateTime<Utc>,
        audit: AuditEvent,
    ) -> StoreResult<AuditLogEntry> {
        let mut tx = self.begin().await?;
        let result = sqlx::query("UPDATE workspaces SET deleted_at = $2 WHERE id = $1 AND deleted_at IS NULL")
            .bind(Uuid::from(id))
            .bind(at)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("soft_delete_workspace", e))?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound("workspace"));
        }
        let entry = insert_audit(&mut tx, audit).await?;
        commit(tx).await?;
        Ok(entry)
    }

    #[instrument(skip(self), err)]
    async fn list_workspaces_for(&self, user: UserId) -> StoreResult<Vec<WorkspaceMembership>> {
        let rows = sqlx::query(
            r#"
            SELECT w.id, w.name, m.role
            FROM workspace_members m
            JOIN workspaces w ON w.id = m.workspace_id
            WHERE m.user_id = $1
              AND m.status = 'APPROVED'
              AND m.removed_at IS NULL
              AND w.deleted_at IS NULL
            ORDER BY m.created_at ASC, m.id ASC
            "#,
        )
        .bind(Uuid::from(user))
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_workspaces_for", e))?;

        rows.iter()
            .map(|row| {
                Ok(WorkspaceMembership {
                    id: WorkspaceId::from_uuid(get(row, "id")?),
                    name: get(row, "name")?,
                    role: parse_role(&get::<String>(row, "role")?)?,
                })
            })
            .collect()
    }

    #[instrument(skip(self), err)]
    async fn find_membership(&self, user: UserId, workspace: WorkspaceId) -> StoreResult<Option<Membership>> {
        let row = sqlx::query(&format!(
            "SELECT {MEMBER_COLUMNS} FROM workspace_members WHERE user_id = $1 AND workspace_id = $2"
        ))
        .bind(Uuid::from(user))
        .bind(Uuid::from(workspace))
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_membership", e))?;
        row.as_ref().map(membership_from_row).transpose()
    }

    #[instrument(skip(self), err)]
    async fn list_members(&self, workspace: WorkspaceId) -> StoreResult<Vec<MemberRecord>> {
        let rows = sqlx::query(
            r#"
            SELECT m.id, m.user_id, m.workspace_id, m.role, m.status, m.removed_at,
                   m.created_at, m.updated_at, u.email
            FROM workspace_members m
            JOIN users u ON u.id = m.user_id
            WHERE m.workspace_id = $1
            ORDER BY m.created_at ASC, m.id ASC
            "#,
        )
        .bind(Uuid::from(workspace))
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_members", e))?;

        rows.iter()
            .map(|row| {
                Ok(MemberRecord {
                    membership: membership_from_row(row)?,
                    email: get(row, "email")?,
                })
            })
            .collect()
    }

    #[instrument(skip(self, audit), err)]
    async fn upsert_invitation(
        &self,
        invitation: Invitation,
        mut audit: AuditEvent,
    ) -> StoreResult<(Membership, AuditLogEntry)> {
        // validates the granted role and builds the insert candidate
        let candidate = Membership::invite(
            None,
            invitation.user_id,
            invitation.workspace_id,
            invitation.role,
            invitation.at,
        )?;

        let mut tx = self.begin().await?;
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO workspace_members ({MEMBER_COLUMNS})
            VALUES ($1, $2, $3, $4, 'PENDING', NULL, $5, $5)
            ON CONFLICT (user_id, workspace_id) DO UPDATE SET
                role = EXCLUDED.role,
                status = 'PENDING',
                removed_at = NULL,
                updated_at = EXCLUDED.updated_at
            WHERE workspace_members.role <> 'OWNER'
            RETURNING {MEMBER_COLUMNS}
            "#
        ))
        .bind(Uuid::from(candidate.id))
        .bind(Uuid::from(candidate.user_id))
        .bind(Uuid::from(candidate.workspace_id))
        .bind(candidate.role.as_str())
        .bind(candidate.created_at)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("upsert_invitation", e))?;

        // no row back means the conflict target was the OWNER row
        let Some(row) = row else {
            tx.rollback().await.map_err(|e| map_sqlx_error("rollback", e))?;
            return Err(StoreError::Lifecycle(worksphere_auth::LifecycleError::OwnerMembershipImmutable));
        };
        let membership = membership_from_row(&row)?;

        audit.entity_id = membership.id.into();
        let entry = insert_audit(&mut tx, audit).await?;
        commit(tx).await?;
        Ok((membership, entry))
    }

    #[instrument(skip(self, updated, audit), fields(membership_id = %updated.id), err)]
    async fn transition_membership(
        &self,
        updated: &Membership,
        from: MembershipState,
        audit: AuditEvent,
    ) -> StoreResult<AuditLogEntry> {
        let state_predicate = match from {
            MembershipState::Pending => "status = 'PENDING' AND removed_at IS NULL",
            MembershipState::Approved => "status = 'APPROVED' AND removed_at IS NULL",
            MembershipState::Rejected => "status = 'REJECTED' AND removed_at IS NULL",
            MembershipState::Removed => "removed_at IS NOT NULL",
        };

        let mut tx = self.begin().await?;
        let result = sqlx::query(&format!(
            r#"
            UPDATE workspace_members
            SET role = $4, status = $5, removed_at = $6, updated_at = $7
            WHERE id = $1 AND user_id = $2 AND workspace_id = $3
              AND role <> 'OWNER'
              AND {state_predicate}
            "#
        ))
        .bind(Uuid::from(updated.id))
        .bind(Uuid::from(updated.user_id))
        .bind(Uuid::from(updated.workspace_id))
        .bind(updated.role.as_str())
        .bind(updated.status.as_str())
        .bind(updated.removed_at)
        .bind(updated.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("transition_membership", e))?;

        if result.rows_affected() == 0 {
            tx.rollback().await.map_err(|e| map_sqlx_error("rollback", e))?;
            return Err(StoreError::ConcurrentWrite("membership changed concurrently".to_string()));
        }
        let entry = insert_audit(&mut tx, audit).await?;
        commit(tx).await?;
        Ok(entry)
    }

    #[instrument(skip(self), err)]
    async fn find_expense(&self, id: ExpenseId) -> StoreResult<Option<Expense>> {
        let row = sqlx::query(&format!("SELECT {EXPENSE_COLUMNS} FROM expenses WHERE id = $1"))
            .bind(Uuid::from(id))
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_expense", e))?;
        row.as_ref().map(expense_from_row).transpose()
    }

    #[instrument(skip(self), err)]
    async fn list_expenses(&self, workspace: WorkspaceId) -> StoreResult<Vec<Expense>> {
        let rows = sqlx::query(&format!(
            "SELECT {EXPENSE_COLUMNS} FROM expenses \
             WHERE workspace_id = $1 AND deleted_at IS NULL \
             ORDER BY occurred_at DESC, id DESC"
        ))
        .bind(Uuid::from(workspace))
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_expenses", e))?;
        rows.iter().map(expense_from_row).collect()
    }

    #[instrument(skip_all, fields(expense_id = %expense.id), err)]
    async fn insert_expense(&self, expense: &Expense, audit: AuditEvent) -> StoreResult<AuditLogEntry> {
        let mut tx = self.begin().await?;
        sqlx::query(&format!(
            "INSERT INTO expenses ({EXPENSE_COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)"
        ))
        .bind(Uuid::from(expense.id))
        .bind(Uuid::from(expense.workspace_id))
        .bind(Uuid::from(expense.user_id))
        .bind(&expense.title)
        .bind(expense.amount.amount_minor())
        .bind(expense.amount.currency())
        .bind(expense.occurred_at)
        .bind(expense.created_at)
        .bind(expense.updated_at)
        .bind(expense.deleted_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("insert_expense", e))?;
        let entry = insert_audit(&mut tx, audit).await?;
        commit(tx).await?;
        Ok(entry)
    }

    #[instrument(skip_all, fields(expense_id = %expense.id), err)]
    async fn update_expense(&self, expense: &Expense, audit: AuditEvent) -> StoreResult<AuditLogEntry> {
        let mut tx = self.begin().await?;
        let result = sqlx::query(
            r#"
            UPDATE expenses
            SET title = $3, amount_cents = $4, currency = $5, occurred_at = $6,
                updated_at = $7, deleted_at = $8
            WHERE id = $1 AND workspace_id = $2 AND deleted_at IS NULL
            "#,
        )
        .bind(Uuid::from(expense.id))
        .bind(Uuid::from(expense.workspace_id))
        .bind(&expense.title)
        .bind(expense.amount.amount_minor())
        .bind(expense.amount.currency())
        .bind(expense.occurred_at)
        .bind(expense.updated_at)
        .bind(expense.deleted_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("update_expense", e))?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound("expense"));
        }
        let entry = insert_audit(&mut tx, audit).await?;
        commit(tx).await?;
        Ok(entry)
    }

    #[instrument(skip(self), err)]
    async fn find_note(&self, id: NoteId) -> StoreResult<Option<Note>> {
        let row = sqlx::query(&format!("SELECT {NOTE_COLUMNS} FROM notes WHERE id = $1"))
            .bind(Uuid::from(id))
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_note", e))?;
        row.as_ref().map(note_from_row).transpose()
    }

    #[instrument(skip(self), err)]
    async fn list_notes(&self, workspace: WorkspaceId) -> StoreResult<Vec<Note>> {
        let rows = sqlx::query(&format!(
            "SELECT {NOTE_COLUMNS} FROM notes \
             WHERE workspace_id = $1 AND deleted_at IS NULL \
             ORDER BY created_at DESC, id DESC"
        ))
        .bind(Uuid::from(workspace))
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_notes", e))?;
        rows.iter().map(note_from_row).collect()
    }

    #[instrument(skip_all, fields(note_id = %note.id), err)]
    async fn insert_note(&self, note: &Note, audit: AuditEvent) -> StoreResult<AuditLogEntry> {
        let mut tx = self.begin().await?;
        sqlx::query(&format!(
            "INSERT INTO notes ({NOTE_COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)"
        ))
        .bind(Uuid::from(note.id))
        .bind(Uuid::from(note.workspace_id))
        .bind(Uuid::from(note.user_id))
        .bind(&note.title)
        .bind(&note.content)
        .bind(note.visibility.as_str())
        .bind(note.created_at)
        .bind(note.updated_at)
        .bind(note.deleted_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("insert_note", e))?;
        let entry = insert_audit(&mut tx, audit).await?;
        commit(tx).await?;
        Ok(entry)
    }

    #[instrument(skip_all, fields(note_id = %note.id), err)]
    async fn update_note(&self, note: &Note, audit: AuditEvent) -> StoreResult<AuditLogEntry> {
        let mut tx = self.begin().await?;
        let result = sqlx::query(
            r#"
            UPDATE notes
            SET title = $3, content = $4, visibility = $5, updated_at = $6, deleted_at = $7
            WHERE id = $1 AND workspace_id = $2 AND deleted_at IS NULL
            "#,
        )
        .bind(Uuid::from(note.id))
        .bind(Uuid::from(note.workspace_id))
        .bind(&note.title)
        .bind(&note.content)
        .bind(note.visibility.as_str())
        .bind(note.updated_at)
        .bind(note.deleted_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("update_note", e))?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound("note"));
        }
        let entry = insert_audit(&mut tx, audit).await?;
        commit(tx).await?;
        Ok(entry)
    }
}

async fn insert_workspace(tx: &mut Transaction<'static, Postgres>, workspace: &Workspace) -> StoreResult<()> {
    sqlx::query("INSERT INTO workspaces (id, name, owner_id, created_at, deleted_at) VALUES ($1, $2, $3, $4, $5)")
        .bind(Uuid::from(workspace.id))
        .bind(&workspace.name)
        .bind(Uuid::from(workspace.owner_id))
        .bind(workspace.created_at)
        .bind(workspace.deleted_at)
        .execute(&mut **tx)
        .await
        .map_err(|e| map_sqlx_error("insert_workspace", e))?;
    Ok(())
}

async fn insert_membership(tx: &mut Transaction<'static, Postgres>, m: &Membership) -> StoreResult<()> {
    sqlx::query(&format!(
        "INSERT INTO workspace_members ({MEMBER_COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)"
    ))
    .bind(Uuid::from(m.id))
    .bind(Uuid::from(m.user_id))
    .bind(Uuid::from(m.workspace_id))
    .bind(m.role.as_str())
    .bind(m.status.as_str())
    .bind(m.removed_at)
    .bind(m.created_at)
    .bind(m.updated_at)
    .execute(&mut **tx)
    .await
    .map_err(|e| map_sqlx_error("insert_membership", e))?;
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Row mapping
// ─────────────────────────────────────────────────────────────────────────────

fn get<'r, T>(row: &'r PgRow, column: &str) -> StoreResult<T>
where
    T: sqlx::Decode<'r, Postgres> + sqlx::Type<Postgres>,
{
    row.try_get(column)
        .map_err(|e| StoreError::Backend(format!("failed to read column {column}: {e}")))
}

fn parse_role(raw: &str) -> StoreResult<Role> {
    raw.parse().map_err(|e| StoreError::Backend(format!("{e}")))
}

fn user_from_row(row: &PgRow) -> StoreResult<User> {
    Ok(User {
        id: UserId::from_uuid(get(row, "id")?),
        email: get(row, "email")?,
        password_hash: get(row, "password_hash")?,
        created_at: get(row, "created_at")?,
    })
}

fn workspace_from_row(row: &PgRow) -> StoreResult<Workspace> {
    Ok(Workspace {
        id: WorkspaceId::from_uuid(get(row, "id")?),
        name: get(row, "name")?,
        owner_id: UserId::from_uuid(get(row, "owner_id")?),
        created_at: get(row, "created_at")?,
        deleted_at: get(row, "deleted_at")?,
    })
}

fn membership_from_row(row: &PgRow) -> StoreResult<Membership> {
    let status: String = get(row, "status")?;
    Ok(Membership {
        id: worksphere_core::MembershipId::from_uuid(get(row, "id")?),
        user_id: UserId::from_uuid(get(row, "user_id")?),
        workspace_id: WorkspaceId::from_uuid(get(row, "workspace_id")?),
        role: parse_role(&get::<String>(row, "role")?)?,
        status: MembershipStatus::parse(&status)
            .ok_or_else(|| StoreError::Backend(format!("unknown membership status '{status}'")))?,
        removed_at: get(row, "removed_at")?,
        created_at: get(row, "created_at")?,
        updated_at: get(row, "updated_at")?,
    })
}

fn expense_from_row(row: &PgRow) -> StoreResult<Expense> {
    let currency: String = get(row, "currency")?;
    let amount = Money::new(get(row, "amount_cents")?, &currency)
        .map_err(|e| StoreError::Backend(format!("stored expense amount is invalid: {e}")))?;
    Ok(Expense {
        id: ExpenseId::from_uuid(get(row, "id")?),
        workspace_id: WorkspaceId::from_uuid(get(row, "workspace_id")?),
        user_id: UserId::from_uuid(get(row, "user_id")?),
        title: get(row, "title")?,
        amount,
        occurred_at: get(row, "occurred_at")?,
        created_at: get(row, "created_at")?,
        updated_at: get(row, "updated_at")?,
        deleted_at: get(row, "deleted_at")?,
    })
}

fn note_from_row(row: &PgRow) -> StoreResult<Note> {
    let visibility: String = get(row, "visibility")?;
    Ok(Note {
        id: NoteId::from_uuid(get(row, "id")?),
        workspace_id: WorkspaceId::from_uuid(get(row, "workspace_id")?),
        user_id: UserId::from_uuid(get(row, "user_id")?),
        title: get(row, "title")?,
        content: get(row, "content")?,
        visibility: visibility
            .parse::<Visibility>()
            .map_err(|e| StoreError::Backend(format!("{e}")))?,
        created_at: get(row, "created_at")?,
        updated_at: get(row, "updated_at")?,
        deleted_at: get(row, "deleted_at")?,
    })
}

/// Map SQLx errors to StoreError.
fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            let msg = format!("database error in {}: {}", operation, db_err.message());
            match db_err.code().as_deref() {
                Some("23505") => StoreError::Conflict(msg),
                Some("40001") => StoreError::ConcurrentWrite(msg),
                _ => StoreError::Backend(msg),
            }
        }
        sqlx::Error::PoolClosed | sqlx::Error::PoolTimedOut => {
            StoreError::Unavailable(format!("connection pool unavailable in {}", operation))
        }
        _ => StoreError::Backend(format!("sqlx error in {}: {}", operation, err)),
    }
}

/// Check if an error is a unique constraint violation.
fn is_unique_violation(err: &sqlx::Error) -> bool {
    if let sqlx::Error::Database(db_err) = err {
        if let Some(code) = db_err.code() {
            return code.as_ref() == "23505";
        }
    }
    false
}
