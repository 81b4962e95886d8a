use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use worksphere_auth::Role;
use worksphere_core::{DomainResult, Entity, UserId, WorkspaceId};

pub const DEFAULT_WORKSPACE_NAME: &str = "My Workspace";

/// Tenant boundary. Never hard-deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workspace {
    pub id: WorkspaceId,
    pub name: String,
    pub owner_id: UserId,
    pub created_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Workspace {
    pub fn create(name: &str, owner_id: UserId, at: DateTime<Utc>) -> DomainResult<Self> {
        Ok(Self {
            id: WorkspaceId::new(),
            name: validate_name(name)?,
            owner_id,
            created_at: at,
            deleted_at: None,
        })
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    pub fn soft_delete(&mut self, at: DateTime<Utc>) {
        if self.deleted_at.is_none() {
            self.deleted_at = Some(at);
        }
    }
}

impl Entity for Workspace {
    type Id = WorkspaceId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

pub(crate) fn validate_name(name: &str) -> DomainResult<String> {
    crate::required_text("name", name)
}

/// A workspace as seen by one of its active members.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkspaceMembership {
    pub id: WorkspaceId,
    pub name: String,
    pub role: Role,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_is_required() {
        assert!(Workspace::create("   ", UserId::new(), Utc::now()).is_err());
        let ws = Workspace::create(" Acme ", UserId::new(), Utc::now()).unwrap();
        assert_eq!(ws.name, "Acme");
        assert!(!ws.is_deleted());
    }

    #[test]
    fn soft_delete_keeps_first_timestamp() {
        let mut ws = Workspace::create("Acme", UserId::new(), Utc::now()).unwrap();
        let first = Utc::now();
        ws.soft_delete(first);
        ws.soft_delete(first + chrono::Duration::seconds(5));
        assert_eq!(ws.deleted_at, Some(first));
    }
}
