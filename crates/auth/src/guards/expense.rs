use crate::authorize::AccessRequest;
use crate::error::AccessError;
use crate::guards::{enforce, locate, WorkspaceResource};
use crate::permissions::Action;
use crate::principal::WorkspaceAccess;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ExpenseAction {
    List,
    Create,
    Update,
    Delete,
}

/// Authorize an expense action. `expense` is required for update/delete and
/// ignored otherwise.
pub fn authorize<R: WorkspaceResource>(
    access: &WorkspaceAccess,
    action: ExpenseAction,
    expense: Option<&R>,
) -> Result<(), AccessError> {
    let request = |a: Action| AccessRequest::new(a, access.role, access.state());
    match action {
        ExpenseAction::List => enforce(request(Action::ListExpenses), access),
        ExpenseAction::Create => enforce(request(Action::CreateExpense), access),
        ExpenseAction::Update | ExpenseAction::Delete => {
            let expense = locate(access, expense, "expense")?;
            let a = if action == ExpenseAction::Update {
                Action::UpdateExpense
            } else {
                Action::DeleteExpense
            };
            enforce(request(a).owned(expense.owner_id() == access.user_id), access)
        }
    }
}
