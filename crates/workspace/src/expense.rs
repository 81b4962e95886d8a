use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use worksphere_auth::WorkspaceResource;
use worksphere_core::{DomainResult, Entity, ExpenseId, Money, UserId, WorkspaceId};

use crate::required_text;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    pub id: ExpenseId,
    pub workspace_id: WorkspaceId,
    /// Creator.
    pub user_id: UserId,
    pub title: String,
    pub amount: Money,
    pub occurred_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Expense {
    pub fn create(
        input: NewExpense,
        workspace_id: WorkspaceId,
        user_id: UserId,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: ExpenseId::new(),
            workspace_id,
            user_id,
            title: input.title,
            amount: input.amount,
            occurred_at: input.occurred_at,
            created_at: at,
            updated_at: at,
            deleted_at: None,
        }
    }

    pub fn soft_delete(&mut self, at: DateTime<Utc>) {
        self.deleted_at = Some(at);
        self.updated_at = at;
    }
}

impl Entity for Expense {
    type Id = ExpenseId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl WorkspaceResource for Expense {
    fn workspace_id(&self) -> WorkspaceId {
        self.workspace_id
    }

    fn owner_id(&self) -> UserId {
        self.user_id
    }

    fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewExpense {
    pub title: String,
    pub amount: Money,
    pub occurred_at: DateTime<Utc>,
}

impl NewExpense {
    pub fn new(
        title: &str,
        amount_cents: i64,
        currency: Option<&str>,
        occurred_at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        Ok(Self {
            title: required_text("title", title)?,
            amount: Money::new(amount_cents, currency.unwrap_or(Money::DEFAULT_CURRENCY))?,
            occurred_at,
        })
    }
}

/// Partial update. Absent fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpensePatch {
    pub title: Option<String>,
    pub amount_cents: Option<i64>,
    pub currency: Option<String>,
    pub occurred_at: Option<DateTime<Utc>>,
}

impl ExpensePatch {
    /// Validate against the current row and apply. Nothing changes on error.
    pub fn apply(&self, expense: &mut Expense, at: DateTime<Utc>) -> DomainResult<()> {
        let title = match &self.title {
            Some(t) => required_text("title", t)?,
            None => expense.title.clone(),
        };
        let amount = match (self.amount_cents, self.currency.as_deref()) {
            (None, None) => expense.amount.clone(),
            (cents, currency) => Money::new(
                cents.unwrap_or(expense.amount.amount_minor()),
                currency.unwrap_or(expense.amount.currency()),
            )?,
        };

        expense.title = title;
        expense.amount = amount;
        if let Some(occurred_at) = self.occurred_at {
            expense.occurred_at = occurred_at;
        }
        expense.updated_at = at;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Expense {
        let input = NewExpense::new("Coffee", 450, None, Utc::now()).unwrap();
        Expense::create(input, WorkspaceId::new(), UserId::new(), Utc::now())
    }

    #[test]
    fn new_expense_defaults_currency() {
        let e = sample();
        assert_eq!(e.amount.currency(), "USD");
        assert_eq!(e.amount.amount_minor(), 450);
        assert!(!e.is_deleted());
    }

    #[test]
    fn new_expense_validation() {
        assert!(NewExpense::new("", 100, None, Utc::now()).is_err());
        assert!(NewExpense::new("Taxi", 0, None, Utc::now()).is_err());
        assert!(NewExpense::new("Taxi", 100, Some("EURO"), Utc::now()).is_err());
    }

    #[test]
    fn patch_changes_only_given_fields() {
        let mut e = sample();
        let patch = ExpensePatch {
            currency: Some("eur".into()),
            ..Default::default()
        };
        patch.apply(&mut e, Utc::now()).unwrap();
        assert_eq!(e.title, "Coffee");
        assert_eq!(e.amount.amount_minor(), 450);
        assert_eq!(e.amount.currency(), "EUR");
    }

    #[test]
    fn invalid_patch_leaves_row_untouched() {
        let mut e = sample();
        let before = e.clone();
        let patch = ExpensePatch {
            title: Some("Lunch".into()),
            amount_cents: Some(-1),
            ..Default::default()
        };
        assert!(patch.apply(&mut e, Utc::now()).is_err());
        assert_eq!(e, before);
    }
}
