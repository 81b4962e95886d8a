//! The canonical policy table: every action the system authorizes and the
//! rule it is checked against.

use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Role;

/// Note visibility. `MEMBERS` is an accepted value that grants the same
/// in-workspace visibility as `PUBLIC`; only `PUBLIC` is reachable anonymously.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Visibility {
    Public,
    #[default]
    Private,
    Members,
}

impl Visibility {
    pub fn as_str(self) -> &'static str {
        match self {
            Visibility::Public => "PUBLIC",
            Visibility::Private => "PRIVATE",
            Visibility::Members => "MEMBERS",
        }
    }
}

impl core::fmt::Display for Visibility {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown visibility '{0}'")]
pub struct UnknownVisibility(pub String);

impl FromStr for Visibility {
    type Err = UnknownVisibility;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PUBLIC" => Ok(Visibility::Public),
            "PRIVATE" => Ok(Visibility::Private),
            "MEMBERS" => Ok(Visibility::Members),
            _ => Err(UnknownVisibility(s.to_string())),
        }
    }
}

/// Something an actor attempts inside a workspace.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    ListExpenses,
    CreateExpense,
    UpdateExpense,
    DeleteExpense,
    ListNotes,
    ReadNote(Visibility),
    CreateNote,
    UpdateNote,
    DeleteNote,
    ListMembers,
    InviteMember,
    DecideInvitation,
    RemoveMember,
    SwitchWorkspace,
    DeleteWorkspace,
}

/// Additional constraint applied once the role floor is met.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OwnershipRule {
    None,
    /// Below ADMIN the actor must own the resource.
    OwnResourceBelowAdmin,
    /// Only the creator, whatever their role.
    CreatorOnly,
    /// PRIVATE resources are visible to their creator only.
    PrivateToCreator,
    /// The granted role must be grantable.
    GrantableRole,
    /// The target membership must not be the OWNER's.
    NotOwnerTarget,
    /// Target must not be OWNER and must pass `can_remove`.
    RemovableTarget,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub struct PolicyRule {
    pub minimum_role: Role,
    pub ownership: OwnershipRule,
}

impl Action {
    pub fn policy(self) -> PolicyRule {
        use OwnershipRule as O;
        let (minimum_role, ownership) = match self {
            Action::ListExpenses => (Role::Viewer, O::None),
            Action::CreateExpense => (Role::Member, O::None),
            Action::UpdateExpense | Action::DeleteExpense => (Role::Member, O::OwnResourceBelowAdmin),
            Action::ListNotes | Action::CreateNote => (Role::Viewer, O::None),
            Action::ReadNote(_) => (Role::Viewer, O::PrivateToCreator),
            Action::UpdateNote | Action::DeleteNote => (Role::Viewer, O::CreatorOnly),
            Action::ListMembers | Action::SwitchWorkspace => (Role::Viewer, O::None),
            Action::InviteMember => (Role::Admin, O::GrantableRole),
            Action::DecideInvitation => (Role::Admin, O::NotOwnerTarget),
            Action::RemoveMember => (Role::Admin, O::RemovableTarget),
            Action::DeleteWorkspace => (Role::Owner, O::None),
        };
        PolicyRule { minimum_role, ownership }
    }

    pub fn name(self) -> &'static str {
        match self {
            Action::ListExpenses => "expense.list",
            Action::CreateExpense => "expense.create",
            Action::UpdateExpense => "expense.update",
            Action::DeleteExpense => "expense.delete",
            Action::ListNotes => "note.list",
            Action::ReadNote(_) => "note.read",
            Action::CreateNote => "note.create",
            Action::UpdateNote => "note.update",
            Action::DeleteNote => "note.delete",
            Action::ListMembers => "member.list",
            Action::InviteMember => "member.invite",
            Action::DecideInvitation => "member.decide",
            Action::RemoveMember => "member.remove",
            Action::SwitchWorkspace => "workspace.switch",
            Action::DeleteWorkspace => "workspace.delete",
        }
    }
}

impl core::fmt::Display for Action {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}
