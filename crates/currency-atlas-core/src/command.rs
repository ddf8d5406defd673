//! Command abstractions.

use uuid::Uuid;

/// Trait implemented by every write request handled by the registry.
pub trait Command: Send + Sync + std::fmt::Debug {
    /// Stable name used in logs, e.g. `registry.submit_event`.
    fn command_type(&self) -> &'static str;

    /// Correlation ID tying log lines of one request together.
    fn correlation_id(&self) -> Uuid;
}
