use serde::Serialize;
use thiserror::Error;

use crate::membership::MembershipState;
use crate::permissions::{Action, OwnershipRule, PolicyRule, Visibility};
use crate::roles::can_remove;
use crate::Role;

/// Everything the engine needs to decide a single action.
///
/// Pure data: construction happens in the guards from already-loaded rows.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct AccessRequest {
    pub action: Action,
    pub actor_role: Role,
    pub actor_state: MembershipState,
    /// Actor created the resource the action targets.
    pub is_resource_owner: bool,
    /// Role granted by an invite, or the role of the membership being
    /// decided/removed.
    pub target_role: Option<Role>,
}

impl AccessRequest {
    pub fn new(action: Action, actor_role: Role, actor_state: MembershipState) -> Self {
        Self {
            action,
            actor_role,
            actor_state,
            is_resource_owner: false,
            target_role: None,
        }
    }

    pub fn owned(mut self, is_resource_owner: bool) -> Self {
        self.is_resource_owner = is_resource_owner;
        self
    }

    pub fn targeting(mut self, role: Role) -> Self {
        self.target_role = Some(role);
        self
    }
}

#[derive(Debug, Error, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DenyReason {
    #[error("no active membership in this workspace")]
    NoActiveMembership,

    #[error("requires {required} role or higher")]
    InsufficientRole { required: Role },

    #[error("only the creator may modify this resource")]
    NotResourceOwner,

    #[error("note is private")]
    PrivateNote,

    #[error("the OWNER role cannot be granted by invitation")]
    OwnerRoleNotGrantable,

    #[error("the workspace owner's membership cannot be changed")]
    OwnerMembershipImmutable,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(DenyReason),
}

impl Decision {
    pub fn is_allowed(self) -> bool {
        matches!(self, Decision::Allow)
    }

    pub fn into_result(self) -> Result<(), DenyReason> {
        match self {
            Decision::Allow => Ok(()),
            Decision::Deny(reason) => Err(reason),
        }
    }
}

/// Decide an action.
///
/// - No IO
/// - No panics
/// - Same input, same answer
pub fn decide(request: &AccessRequest) -> Decision {
    match evaluate(request) {
        Ok(()) => Decision::Allow,
        Err(reason) => Decision::Deny(reason),
    }
}

fn evaluate(req: &AccessRequest) -> Result<(), DenyReason> {
    if !req.actor_state.grants_access() {
        return Err(DenyReason::NoActiveMembership);
    }

    let PolicyRule { minimum_role, ownership } = req.action.policy();
    if !req.actor_role.at_least(minimum_role) {
        return Err(DenyReason::InsufficientRole { required: minimum_role });
    }

    match ownership {
        OwnershipRule::None => Ok(()),
        OwnershipRule::OwnResourceBelowAdmin => {
            if req.is_resource_owner || req.actor_role.at_least(Role::Admin) {
                Ok(())
            } else {
                Err(DenyReason::NotResourceOwner)
            }
        }
        OwnershipRule::CreatorOnly => {
            if req.is_resource_owner {
                Ok(())
            } else {
                Err(DenyReason::NotResourceOwner)
            }
        }
        OwnershipRule::PrivateToCreator => match req.action {
            Action::ReadNote(Visibility::Private) if !req.is_resource_owner => Err(DenyReason::PrivateNote),
            _ => Ok(()),
        },
        OwnershipRule::GrantableRole => match req.target_role {
            Some(role) if !role.is_grantable() => Err(DenyReason::OwnerRoleNotGrantable),
            _ => Ok(()),
        },
        OwnershipRule::NotOwnerTarget => match req.target_role {
            Some(Role::Owner) => Err(DenyReason::OwnerMembershipImmutable),
            _ => Ok(()),
        },
        OwnershipRule::RemovableTarget => match req.target_role {
            Some(Role::Owner) => Err(DenyReason::OwnerMembershipImmutable),
            Some(target) if !can_remove(req.actor_role, target) => {
                Err(DenyReason::InsufficientRole { required: Role::Owner })
            }
            _ => Ok(()),
        },
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Authorization Explanation (Audit Trail)
// ─────────────────────────────────────────────────────────────────────────────

/// Debuggable account of why an action was allowed or denied.
#[derive(Debug, Clone, Serialize)]
pub struct AuthorizationExplanation {
    pub action: Action,
    pub granted: bool,
    pub reason: String,
    pub policy: PolicyRule,
    pub actor: ActorState,
    pub denial: Option<DenyReason>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ActorState {
    pub role: Role,
    pub membership: MembershipState,
    pub is_resource_owner: bool,
    pub target_role: Option<Role>,
}

pub fn explain(request: &AccessRequest) -> AuthorizationExplanation {
    let policy = request.action.policy();
    let decision = decide(request);

    let (granted, reason, denial) = match decision {
        Decision::Allow => (
            true,
            format!(
                "{} allowed: {} meets minimum {}",
                request.action, request.actor_role, policy.minimum_role
            ),
            None,
        ),
        Decision::Deny(why) => (false, format!("{} denied: {}", request.action, why), Some(why)),
    };

    AuthorizationExplanation {
        action: request.action,
        granted,
        reason,
        policy,
        actor: ActorState {
            role: request.actor_role,
            membership: request.actor_state,
            is_resource_owner: request.is_resource_owner,
            target_role: request.target_role,
        },
        denial,
    }
}
