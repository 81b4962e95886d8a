//! Infrastructure layer: persistence, credential hashing and the application
//! service that ties the authorization guards to storage.

pub mod password;
pub mod service;
pub mod store;

pub use password::{Argon2Hasher, PasswordHashError, PasswordHasher};
pub use service::{Account, ExpenseDraft, NoteDraft, NoteEdit, ServiceError, ServiceResult, WorkspaceService};
pub use store::{InMemoryWorkspaceStore, MemberRecord, StoreError, StoreResult, WorkspaceStore};

#[cfg(feature = "postgres")]
pub use store::PostgresWorkspaceStore;
