use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use worksphere_core::{DomainError, DomainResult, Entity, UserId};

use crate::workspace::DEFAULT_WORKSPACE_NAME;

pub const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    /// PHC-formatted hash. Never serialized outward.
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl Entity for User {
    type Id = UserId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Emails are compared exactly as stored after trimming.
pub fn normalize_email(raw: &str) -> DomainResult<String> {
    let email = raw.trim();
    let valid = match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty() && !domain.contains('@'),
        None => false,
    };
    if !valid || email.chars().any(char::is_whitespace) {
        return Err(DomainError::validation("email must be a valid address"));
    }
    Ok(email.to_string())
}

/// Validated signup request. The password is still plaintext here; hashing
/// happens at the persistence boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signup {
    pub email: String,
    pub password: String,
    pub workspace_name: String,
}

impl Signup {
    pub fn new(email: &str, password: &str, workspace_name: Option<&str>) -> DomainResult<Self> {
        let email = normalize_email(email)?;
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(DomainError::validation(format!(
                "password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }
        let workspace_name = match workspace_name.map(str::trim).filter(|s| !s.is_empty()) {
            Some(name) => crate::workspace::validate_name(name)?,
            None => DEFAULT_WORKSPACE_NAME.to_string(),
        };
        Ok(Self {
            email,
            password: password.to_string(),
            workspace_name,
        })
    }
}
