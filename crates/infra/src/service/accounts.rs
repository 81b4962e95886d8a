use std::sync::Arc;

use serde::Serialize;

use worksphere_auth::{AccessError, Membership};
use worksphere_core::UserId;
use worksphere_events::{AuditAction, AuditEvent};
use worksphere_workspace::{Signup, User, Workspace};

use super::{ServiceError, ServiceResult, WorkspaceService};
use crate::password::{PasswordHashError, PasswordHasher};
use crate::store::NewAccount;

/// A signed-up user together with the workspace created for them.
#[derive(Debug, Clone, Serialize)]
pub struct Account {
    pub user: User,
    pub workspace: Workspace,
}

impl WorkspaceService {
    /// Create a user, their first workspace and its OWNER membership in one
    /// transaction. A taken email is `CONFLICT`.
    pub async fn signup(&self, input: Signup) -> ServiceResult<Account> {
        if self.store.find_user_by_email(&input.email).await?.is_some() {
            return Err(AccessError::Conflict("email already registered".to_string()).into());
        }

        let password_hash = hash_blocking(self.hasher.clone(), input.password).await?;
        let now = self.now();
        let user = User {
            id: UserId::new(),
            email: input.email,
            password_hash,
            created_at: now,
        };
        let workspace = Workspace::create(&input.workspace_name, user.id, now)?;
        let owner = Membership::owner(user.id, workspace.id, now);

        let audit = vec![
            AuditEvent::new(AuditAction::WorkspaceCreate, workspace.id, now)
                .in_workspace(workspace.id)
                .by(user.id),
            AuditEvent::new(AuditAction::UserSignup, user.id, now)
                .in_workspace(workspace.id)
                .by(user.id),
        ];
        let account = NewAccount { user, workspace, owner };
        let entries = self.store.create_account(&account, audit).await?;
        for entry in &entries {
            self.emit(entry);
        }

        tracing::info!(user_id = %account.user.id, workspace_id = %account.workspace.id, "user signed up");
        Ok(Account {
            user: account.user,
            workspace: account.workspace,
        })
    }

    /// Unknown email and wrong password fail identically.
    pub async fn login(&self, email: &str, password: &str) -> ServiceResult<User> {
        let Some(user) = self.store.find_user_by_email(email.trim()).await? else {
            return Err(AccessError::Unauthenticated.into());
        };

        let hasher = self.hasher.clone();
        let (hash, candidate) = (user.password_hash.clone(), password.to_string());
        let matches = tokio::task::spawn_blocking(move || hasher.verify(&candidate, &hash))
            .await
            .map_err(|_| PasswordHashError)??;
        if !matches {
            tracing::debug!(user_id = %user.id, "login rejected");
            return Err(AccessError::Unauthenticated.into());
        }
        Ok(user)
    }

    /// Resolve a token subject. A user that no longer exists is unauthenticated.
    pub async fn authenticate(&self, user_id: UserId) -> ServiceResult<User> {
        self.store
            .find_user(user_id)
            .await?
            .ok_or(ServiceError::Access(AccessError::Unauthenticated))
    }
}

async fn hash_blocking(hasher: Arc<dyn PasswordHasher>, password: String) -> ServiceResult<String> {
    let hash = tokio::task::spawn_blocking(move || hasher.hash(&password))
        .await
        .map_err(|_| PasswordHashError)??;
    Ok(hash)
}
