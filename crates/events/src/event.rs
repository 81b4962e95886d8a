use chrono::{DateTime, Utc};

/// A recorded fact. Never mutated once constructed, only appended.
pub trait Event: Clone + core::fmt::Debug + Send + Sync + 'static {
    /// Stable tag that identifies the kind of fact (e.g. `"MEMBER_INVITE"`).
    fn event_type(&self) -> &'static str;

    /// Payload schema version.
    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc>;
}
