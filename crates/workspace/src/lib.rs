//! Tenant-scoped records and the validated inputs that create or change them.

pub mod expense;
pub mod note;
pub mod user;
pub mod workspace;

pub use expense::{Expense, ExpensePatch, NewExpense};
pub use note::{NewNote, Note, NotePatch};
pub use user::{normalize_email, Signup, User};
pub use workspace::{Workspace, WorkspaceMembership, DEFAULT_WORKSPACE_NAME};

use worksphere_core::{DomainError, DomainResult};

/// Trimmed, non-empty text field.
pub(crate) fn required_text(field: &str, value: &str) -> DomainResult<String> {
    let v = value.trim();
    if v.is_empty() {
        return Err(DomainError::validation(format!("{field} must not be empty")));
    }
    Ok(v.to_string())
}
