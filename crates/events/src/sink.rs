use std::sync::Mutex;

use crate::AuditLogEntry;

/// Observer notified after an audit entry has been committed.
///
/// Sinks never influence a decision or a commit; failures are swallowed.
pub trait AuditSink: Send + Sync {
    fn emit(&self, entry: &AuditLogEntry);
}

/// Default sink: one structured log line per entry.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn emit(&self, entry: &AuditLogEntry) {
        let e = &entry.event;
        tracing::info!(
            audit_id = %entry.id,
            action = %e.action,
            entity = %e.entity,
            entity_id = %e.entity_id,
            workspace_id = ?e.workspace_id.map(|w| w.to_string()),
            user_id = ?e.user_id.map(|u| u.to_string()),
            "audit"
        );
    }
}

/// Keeps every emitted entry in memory. Useful for wiring checks.
#[derive(Debug, Default)]
pub struct CollectingAuditSink {
    inner: Mutex<Vec<AuditLogEntry>>,
}

impl CollectingAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<AuditLogEntry> {
        match self.inner.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl AuditSink for CollectingAuditSink {
    fn emit(&self, entry: &AuditLogEntry) {
        match self.inner.lock() {
            Ok(mut guard) => guard.push(entry.clone()),
            Err(poisoned) => poisoned.into_inner().push(entry.clone()),
        }
    }
}

impl<S: AuditSink + ?Sized> AuditSink for std::sync::Arc<S> {
    fn emit(&self, entry: &AuditLogEntry) {
        (**self).emit(entry)
    }
}
