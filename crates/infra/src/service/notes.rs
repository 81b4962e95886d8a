use serde_json::json;

use worksphere_auth::guards::note::{authorize, is_publicly_visible, is_visible, NoteAction};
use worksphere_auth::{AccessError, RequestContext, Visibility};
use worksphere_core::NoteId;
use worksphere_events::{AuditAction, AuditEvent};
use worksphere_workspace::{NewNote, Note, NotePatch};

use super::{ServiceResult, WorkspaceService};

/// Unvalidated note input. `visibility` is the raw value, PRIVATE when absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteDraft {
    pub title: String,
    pub content: String,
    pub visibility: Option<String>,
}

/// Unvalidated partial note update. Absent fields stay as they are.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteEdit {
    pub title: Option<String>,
    pub content: Option<String>,
    pub visibility: Option<String>,
}

impl NoteEdit {
    fn into_patch(self) -> ServiceResult<NotePatch> {
        Ok(NotePatch {
            visibility: parse_visibility(self.visibility.as_deref())?,
            title: self.title,
            content: self.content,
        })
    }
}

fn parse_visibility(raw: Option<&str>) -> ServiceResult<Option<Visibility>> {
    let parsed = raw
        .map(|v| v.parse::<Visibility>().map_err(|e| AccessError::BadRequest(e.to_string())))
        .transpose()?;
    Ok(parsed)
}

impl WorkspaceService {
    /// Notes of the active workspace the caller may read, newest first.
    ///
    /// Other users' PRIVATE notes are filtered out for every role.
    pub async fn list_notes(&self, ctx: &RequestContext) -> ServiceResult<Vec<Note>> {
        let access = self.active_workspace(ctx).await?;
        authorize::<Note>(&access, NoteAction::List, None)?;
        let notes = self.store.list_notes(access.workspace_id).await?;
        Ok(notes.into_iter().filter(|n| is_visible(&access, n)).collect())
    }

    pub async fn get_note(&self, ctx: &RequestContext, id: NoteId) -> ServiceResult<Note> {
        let access = self.active_workspace(ctx).await?;
        let note = self.store.find_note(id).await?;
        authorize(&access, NoteAction::Read, note.as_ref())?;
        Ok(note.ok_or(AccessError::NotFound("note"))?)
    }

    pub async fn create_note(&self, ctx: &RequestContext, draft: NoteDraft) -> ServiceResult<Note> {
        let access = self.active_workspace(ctx).await?;
        authorize::<Note>(&access, NoteAction::Create, None)?;
        let visibility = parse_visibility(draft.visibility.as_deref())?;
        let input = NewNote::new(&draft.title, &draft.content, visibility)?;

        let now = self.now();
        let note = Note::create(input, access.workspace_id, access.user_id, now);
        let audit = AuditEvent::new(AuditAction::NoteCreate, note.id, now)
            .in_workspace(access.workspace_id)
            .by(access.user_id)
            .with_meta(json!({ "visibility": note.visibility.as_str() }));
        let entry = self.store.insert_note(&note, audit).await?;
        self.emit(&entry);
        Ok(note)
    }

    /// Only the creator may edit, whatever their role.
    pub async fn update_note(&self, ctx: &RequestContext, id: NoteId, edit: NoteEdit) -> ServiceResult<Note> {
        let access = self.active_workspace(ctx).await?;
        let existing = self.store.find_note(id).await?;
        authorize(&access, NoteAction::Update, existing.as_ref())?;
        let mut note = existing.ok_or(AccessError::NotFound("note"))?;
        let patch = edit.into_patch()?;

        let now = self.now();
        patch.apply(&mut note, now)?;
        let audit = AuditEvent::new(AuditAction::NoteUpdate, note.id, now)
            .in_workspace(access.workspace_id)
            .by(access.user_id)
            .with_meta(patch.summary());
        let entry = self.store.update_note(&note, audit).await?;
        self.emit(&entry);
        Ok(note)
    }

    /// Creator only, like updates.
    pub async fn delete_note(&self, ctx: &RequestContext, id: NoteId) -> ServiceResult<Note> {
        let access = self.active_workspace(ctx).await?;
        let existing = self.store.find_note(id).await?;
        authorize(&access, NoteAction::Delete, existing.as_ref())?;
        let mut note = existing.ok_or(AccessError::NotFound("note"))?;

        let now = self.now();
        note.soft_delete(now);
        let audit = AuditEvent::new(AuditAction::NoteDelete, note.id, now)
            .in_workspace(access.workspace_id)
            .by(access.user_id);
        let entry = self.store.update_note(&note, audit).await?;
        self.emit(&entry);
        Ok(note)
    }

    /// Anonymous read of a PUBLIC note. Anything else looks missing.
    pub async fn public_note(&self, id: NoteId) -> ServiceResult<Note> {
        let Some(note) = self.store.find_note(id).await? else {
            return Err(AccessError::NotFound("note").into());
        };
        let workspace = self.store.find_workspace(note.workspace_id).await?;
        let live = workspace.is_some_and(|w| !w.is_deleted());
        if !is_publicly_visible(&note, live) {
            return Err(AccessError::NotFound("note").into());
        }
        Ok(note)
    }
}
