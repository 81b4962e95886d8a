use crate::authorize::{decide, AccessRequest};
use crate::error::AccessError;
use crate::guards::{enforce, locate, NoteResource};
use crate::permissions::{Action, Visibility};
use crate::principal::WorkspaceAccess;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum NoteAction {
    List,
    Read,
    Create,
    Update,
    Delete,
}

/// Authorize a note action. `note` is required for read/update/delete.
///
/// Reading another user's PRIVATE note is `Forbidden`: the caller is a member
/// and may know the note exists, but not see it.
pub fn authorize<R: NoteResource>(
    access: &WorkspaceAccess,
    action: NoteAction,
    note: Option<&R>,
) -> Result<(), AccessError> {
    let request = |a: Action| AccessRequest::new(a, access.role, access.state());
    match action {
        NoteAction::List => enforce(request(Action::ListNotes), access),
        NoteAction::Create => enforce(request(Action::CreateNote), access),
        NoteAction::Read => {
            let note = locate(access, note, "note")?;
            enforce(
                request(Action::ReadNote(note.visibility())).owned(note.owner_id() == access.user_id),
                access,
            )
        }
        NoteAction::Update | NoteAction::Delete => {
            let note = locate(access, note, "note")?;
            let a = if action == NoteAction::Update {
                Action::UpdateNote
            } else {
                Action::DeleteNote
            };
            enforce(request(a).owned(note.owner_id() == access.user_id), access)
        }
    }
}

/// Whether `note` belongs in the actor's workspace listing.
pub fn is_visible<R: NoteResource>(access: &WorkspaceAccess, note: &R) -> bool {
    if note.workspace_id() != access.workspace_id || note.is_deleted() {
        return false;
    }
    let request = AccessRequest::new(Action::ReadNote(note.visibility()), access.role, access.state())
        .owned(note.owner_id() == access.user_id);
    decide(&request).is_allowed()
}

/// Anonymous view: only PUBLIC, live notes in a live workspace.
pub fn is_publicly_visible<R: NoteResource>(note: &R, workspace_live: bool) -> bool {
    workspace_live && !note.is_deleted() && note.visibility() == Visibility::Public
}
