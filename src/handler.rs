use std::sync::Arc;

use serde_json::Value;

use crate::record::{Record, Severity};

/// Structured-record handler: the seam between the facade and a concrete
/// renderer.
///
/// Implementations are immutable; `with_attrs` and `with_group` return a
/// new handler carrying the extended state, so handler values derived
/// from a common parent never interfere with each other.
pub trait Handler: Send + Sync {
    /// Whether a record at this severity would be rendered at all. The
    /// facade checks this before building a record.
    fn enabled(&self, severity: Severity) -> bool;

    /// Render one record and write it to the sink.
    fn handle(&self, record: &Record) -> Result<(), HandlerError>;

    /// A new handler with the given attributes appended to the bound set,
    /// preserving binding order.
    fn with_attrs(&self, attrs: Vec<(String, Value)>) -> Arc<dyn Handler>;

    /// A new handler with `name` appended to the open group path. Keys of
    /// attributes bound or supplied afterwards are namespaced under the
    /// path. An empty name leaves the handler unchanged.
    fn with_group(&self, name: &str) -> Arc<dyn Handler>;
}

/// Failure while rendering or writing a record. Reported once by the
/// facade and never retried.
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    #[error("log write failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("log serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}
