//! Audit events emitted by every authorized mutation.

pub mod audit;
pub mod event;
pub mod sink;

pub use audit::{AuditAction, AuditEvent, AuditLogEntry, EntityKind, UnknownAuditAction};
pub use event::Event;
pub use sink::{AuditSink, CollectingAuditSink, TracingAuditSink};
