use core::cmp::Ordering;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Workspace role.
///
/// Totally ordered by privilege: `Owner > Admin > Member > Viewer`. Ordering is
/// derived from [`Role::rank`], never from the serialized name.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Owner,
    Admin,
    Member,
    Viewer,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Owner, Role::Admin, Role::Member, Role::Viewer];

    pub fn rank(self) -> u8 {
        match self {
            Role::Owner => 4,
            Role::Admin => 3,
            Role::Member => 2,
            Role::Viewer => 1,
        }
    }

    /// `true` iff `self` ranks at or above `required`.
    pub fn at_least(self, required: Role) -> bool {
        self.rank() >= required.rank()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Owner => "OWNER",
            Role::Admin => "ADMIN",
            Role::Member => "MEMBER",
            Role::Viewer => "VIEWER",
        }
    }

    /// Roles that an invitation may carry. OWNER is only ever created with the workspace.
    pub fn is_grantable(self) -> bool {
        self != Role::Owner
    }
}

/// Free-function form of [`Role::at_least`].
pub fn at_least(role: Role, required: Role) -> bool {
    role.at_least(required)
}

/// Invite and decide on invitations: ADMIN or OWNER.
pub fn can_manage_members(role: Role) -> bool {
    role.at_least(Role::Admin)
}

/// OWNER may remove anyone, ADMIN anyone but an OWNER, MEMBER/VIEWER no one.
pub fn can_remove(actor: Role, target: Role) -> bool {
    match actor {
        Role::Owner => true,
        Role::Admin => target != Role::Owner,
        Role::Member | Role::Viewer => false,
    }
}

impl PartialOrd for Role {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Role {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank().cmp(&other.rank())
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role '{0}'")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "OWNER" => Ok(Role::Owner),
            "ADMIN" => Ok(Role::Admin),
            "MEMBER" => Ok(Role::Member),
            "VIEWER" => Ok(Role::Viewer),
            _ => Err(UnknownRole(s.to_string())),
        }
    }
}
