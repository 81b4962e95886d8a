//! `worksphere-auth`: pure authorization boundary for workspaces.
//!
//! No HTTP, no storage, no clocks: every decision is a function of the rows
//! and context passed in.

pub mod authorize;
pub mod claims;
pub mod error;
pub mod guards;
pub mod membership;
pub mod permissions;
pub mod principal;
pub mod roles;

pub use authorize::{decide, explain, AccessRequest, AuthorizationExplanation, Decision, DenyReason};
pub use claims::{validate_claims, JwtClaims, JwtValidator, TokenIssuer, TokenValidationError};
pub use error::{AccessError, ErrorCode};
pub use guards::{NoteResource, WorkspaceResource};
pub use membership::{
    InvitationDecision, LifecycleError, Membership, MembershipState, MembershipStatus, UnknownDecision,
};
pub use permissions::{Action, Visibility};
pub use principal::{resolve_access, RequestContext, WorkspaceAccess, WorkspaceSelector};
pub use roles::Role;
