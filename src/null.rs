use std::sync::Arc;

use serde_json::Value;

use crate::logger::Logger;

/// A logger that discards everything.
///
/// The safe default for collaborators that were handed no logger: no
/// output, no allocation of context, and `fatal` does not terminate the
/// process.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullLogger;

impl Logger for NullLogger {
    fn trace(&self, _msg: &str, _kvs: &[Value]) {}
    fn debug(&self, _msg: &str, _kvs: &[Value]) {}
    fn info(&self, _msg: &str, _kvs: &[Value]) {}
    fn warn(&self, _msg: &str, _kvs: &[Value]) {}
    fn error(&self, _msg: &str, _kvs: &[Value]) {}

    // Records nothing and, unlike live backends, does not exit.
    fn fatal(&self, _msg: &str, _kvs: &[Value]) {}

    fn with(&self, _key: &str, _value: Value) -> Arc<dyn Logger> {
        Arc::new(NullLogger)
    }

    fn with_group(&self, _group: &str) -> Arc<dyn Logger> {
        Arc::new(NullLogger)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kvs;

    #[test]
    fn fatal_does_not_terminate() {
        NullLogger.fatal("shutting down", kvs![]);
    }

    #[test]
    fn derivation_chain_stays_usable() {
        let base = NullLogger;
        let child = base.with("a", serde_json::json!(1)).with_group("svc");
        child.info("x", kvs!["onlykey"]);
        base.error("still fine", kvs![]);
    }
}
