use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use worksphere_auth::{NoteResource, Visibility, WorkspaceResource};
use worksphere_core::{DomainResult, Entity, NoteId, UserId, WorkspaceId};

use crate::required_text;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub workspace_id: WorkspaceId,
    /// Creator. The only user who may edit or delete the note.
    pub user_id: UserId,
    pub title: String,
    pub content: String,
    pub visibility: Visibility,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Note {
    pub fn create(input: NewNote, workspace_id: WorkspaceId, user_id: UserId, at: DateTime<Utc>) -> Self {
        Self {
            id: NoteId::new(),
            workspace_id,
            user_id,
            title: input.title,
            content: input.content,
            visibility: input.visibility,
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

impl Entity for Note {
    type Id = NoteId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl WorkspaceResource for Note {
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

impl NoteResource for Note {
    fn visibility(&self) -> Visibility {
        self.visibility
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNote {
    pub title: String,
    pub content: String,
    pub visibility: Visibility,
}

impl NewNote {
    pub fn new(title: &str, content: &str, visibility: Option<Visibility>) -> DomainResult<Self> {
        Ok(Self {
            title: required_text("title", title)?,
            content: required_text("content", content)?,
            visibility: visibility.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotePatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub visibility: Option<Visibility>,
}

impl NotePatch {
    pub fn apply(&self, note: &mut Note, at: DateTime<Utc>) -> DomainResult<()> {
        let title = self.title.as_deref().map(|t| required_text("title", t)).transpose()?;
        let content = self.content.as_deref().map(|c| required_text("content", c)).transpose()?;

        if let Some(title) = title {
            note.title = title;
        }
        if let Some(content) = content {
            note.content = content;
        }
        if let Some(visibility) = self.visibility {
            note.visibility = visibility;
        }
        note.updated_at = at;
        Ok(())
    }

    /// Changed fields, for audit metadata.
    pub fn summary(&self) -> serde_json::Value {
        let mut map = serde_json::Map::new();
        if let Some(t) = &self.title {
            map.insert("title".into(), t.clone().into());
        }
        if let Some(c) = &self.content {
            map.insert("content".into(), c.clone().into());
        }
        if let Some(v) = self.visibility {
            map.insert("visibility".into(), v.as_str().into());
        }
        serde_json::Value::Object(map)
    }
}
