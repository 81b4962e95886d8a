use chrono::{DateTime, Utc};
use serde_json::json;

use worksphere_auth::guards::expense::{authorize, ExpenseAction};
use worksphere_auth::{AccessError, RequestContext};
use worksphere_core::ExpenseId;
use worksphere_events::{AuditAction, AuditEvent};
use worksphere_workspace::{Expense, ExpensePatch, NewExpense};

use super::{ServiceResult, WorkspaceService};

/// Unvalidated expense input. Validated only after the caller is authorized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpenseDraft {
    pub title: String,
    pub amount_cents: i64,
    pub currency: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

impl ExpenseDraft {
    fn validate(&self) -> ServiceResult<NewExpense> {
        Ok(NewExpense::new(
            &self.title,
            self.amount_cents,
            self.currency.as_deref(),
            self.occurred_at,
        )?)
    }
}

impl WorkspaceService {
    /// Live expenses of the active workspace, newest `occurred_at` first.
    pub async fn list_expenses(&self, ctx: &RequestContext) -> ServiceResult<Vec<Expense>> {
        let access = self.active_workspace(ctx).await?;
        authorize::<Expense>(&access, ExpenseAction::List, None)?;
        Ok(self.store.list_expenses(access.workspace_id).await?)
    }

    pub async fn create_expense(&self, ctx: &RequestContext, draft: ExpenseDraft) -> ServiceResult<Expense> {
        let access = self.active_workspace(ctx).await?;
        authorize::<Expense>(&access, ExpenseAction::Create, None)?;
        let input = draft.validate()?;

        let now = self.now();
        let expense = Expense::create(input, access.workspace_id, access.user_id, now);
        let audit = AuditEvent::new(AuditAction::ExpenseCreate, expense.id, now)
            .in_workspace(access.workspace_id)
            .by(access.user_id);
        let entry = self.store.insert_expense(&expense, audit).await?;
        self.emit(&entry);
        Ok(expense)
    }

    /// MEMBER: own expenses only. ADMIN and OWNER: any expense in the workspace.
    pub async fn update_expense(
        &self,
        ctx: &RequestContext,
        id: ExpenseId,
        patch: ExpensePatch,
    ) -> ServiceResult<Expense> {
        let access = self.active_workspace(ctx).await?;
        let existing = self.store.find_expense(id).await?;
        authorize(&access, ExpenseAction::Update, existing.as_ref())?;
        let mut expense = existing.ok_or(AccessError::NotFound("expense"))?;

        let now = self.now();
        patch.apply(&mut expense, now)?;
        let audit = AuditEvent::new(AuditAction::ExpenseUpdate, expense.id, now)
            .in_workspace(access.workspace_id)
            .by(access.user_id)
            .with_meta(json!({ "amountCents": expense.amount.amount_minor(), "currency": expense.amount.currency() }));
        let entry = self.store.update_expense(&expense, audit).await?;
        self.emit(&entry);
        Ok(expense)
    }

    pub async fn delete_expense(&self, ctx: &RequestContext, id: ExpenseId) -> ServiceResult<Expense> {
        let access = self.active_workspace(ctx).await?;
        let existing = self.store.find_expense(id).await?;
        authorize(&access, ExpenseAction::Delete, existing.as_ref())?;
        let mut expense = existing.ok_or(AccessError::NotFound("expense"))?;

        let now = self.now();
        expense.soft_delete(now);
        let audit = AuditEvent::new(AuditAction::ExpenseSoftDelete, expense.id, now)
            .in_workspace(access.workspace_id)
            .by(access.user_id);
        let entry = self.store.update_expense(&expense, audit).await?;
        self.emit(&entry);
        Ok(expense)
    }
}
