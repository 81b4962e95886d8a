//! Access-control error model and the stable machine-readable error codes.

use serde::Serialize;
use thiserror::Error;

use crate::authorize::DenyReason;
use crate::membership::LifecycleError;

/// Stable, externally visible error codes.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    Unauthenticated,
    NoWorkspace,
    NotFound,
    Forbidden,
    BadRequest,
    Conflict,
    Internal,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::Unauthenticated => "UNAUTHENTICATED",
            ErrorCode::NoWorkspace => "NO_WORKSPACE",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::Forbidden => "FORBIDDEN",
            ErrorCode::BadRequest => "BAD_REQUEST",
            ErrorCode::Conflict => "CONFLICT",
            ErrorCode::Internal => "INTERNAL",
        }
    }

    /// Transport status for this code (HTTP semantics, kept framework-free).
    pub fn http_status(self) -> u16 {
        match self {
            ErrorCode::Unauthenticated => 401,
            ErrorCode::NoWorkspace => 400,
            ErrorCode::NotFound => 404,
            ErrorCode::Forbidden => 403,
            ErrorCode::BadRequest => 400,
            ErrorCode::Conflict => 409,
            ErrorCode::Internal => 500,
        }
    }
}

impl core::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal failure for a request, produced by the guards.
///
/// Workspace-context failures (unknown workspace, unapproved or removed
/// membership, deleted workspace) all collapse into `NotFound("workspace")`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AccessError {
    #[error("missing or invalid credentials")]
    Unauthenticated,

    #[error("active workspace not provided")]
    NoWorkspace,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    Forbidden(DenyReason),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Conflict(String),
}

impl AccessError {
    pub fn workspace_not_found() -> Self {
        Self::NotFound("workspace")
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            AccessError::Unauthenticated => ErrorCode::Unauthenticated,
            AccessError::NoWorkspace => ErrorCode::NoWorkspace,
            AccessError::NotFound(_) => ErrorCode::NotFound,
            AccessError::Forbidden(_) => ErrorCode::Forbidden,
            AccessError::BadRequest(_) => ErrorCode::BadRequest,
            AccessError::Conflict(_) => ErrorCode::Conflict,
        }
    }

    pub fn http_status(&self) -> u16 {
        self.code().http_status()
    }
}

impl From<DenyReason> for AccessError {
    fn from(reason: DenyReason) -> Self {
        match reason {
            DenyReason::NoActiveMembership => AccessError::workspace_not_found(),
            DenyReason::OwnerRoleNotGrantable => AccessError::BadRequest(reason.to_string()),
            other => AccessError::Forbidden(other),
        }
    }
}

impl From<LifecycleError> for AccessError {
    fn from(err: LifecycleError) -> Self {
        match err {
            LifecycleError::OwnerRoleNotGrantable => AccessError::from(DenyReason::OwnerRoleNotGrantable),
            LifecycleError::OwnerMembershipImmutable => {
                AccessError::Forbidden(DenyReason::OwnerMembershipImmutable)
            }
            LifecycleError::NotPending(_) | LifecycleError::AlreadyInactive => {
                AccessError::Conflict(err.to_string())
            }
        }
    }
}
