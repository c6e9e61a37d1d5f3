use std::fmt;
use std::sync::{Arc, RwLock};

use serde::Serialize;
use serde_json::Value;

use crate::logger::{Level, Logger};

/// A single captured emission.
///
/// `kvs` keeps the raw call-time sequence as received; `attrs` is a
/// snapshot of the attributes bound on the emitting logger at append time,
/// so deriving further children later never rewrites history.
#[derive(Debug, Clone, Serialize)]
pub struct CapturedEntry {
    pub level: Level,
    pub message: String,
    pub kvs: Vec<Value>,
    pub attrs: Vec<(String, Value)>,
    pub group: String,
}

/// A logger that captures every emission in memory for assertions.
///
/// Loggers derived via `with`/`with_group` share the root's entry
/// sequence, so a test can assert against the root and still observe
/// emissions made through any child. Each derived value carries its own
/// attribute/group snapshot; only the entry sequence is shared.
///
/// Safe for concurrent emission and concurrent inspection: every query
/// returns independent copies, never a view into the internal sequence.
#[derive(Clone, Default)]
pub struct MockLogger {
    entries: Arc<RwLock<Vec<CapturedEntry>>>,
    attrs: Vec<(String, Value)>,
    group: String,
}

impl MockLogger {
    pub fn new() -> Self {
        MockLogger::default()
    }

    fn record(&self, level: Level, msg: &str, kvs: &[Value]) {
        let entry = CapturedEntry {
            level,
            message: msg.to_string(),
            kvs: kvs.to_vec(),
            attrs: self.attrs.clone(),
            group: self.group.clone(),
        };
        self.entries
            .write()
            .expect("entries lock poisoned")
            .push(entry);
    }

    /// Snapshot of all captured entries, oldest first.
    pub fn entries(&self) -> Vec<CapturedEntry> {
        self.entries.read().expect("entries lock poisoned").clone()
    }

    /// Whether an entry with the given level and message was captured.
    pub fn has_entry(&self, level: Level, message: &str) -> bool {
        self.entries
            .read()
            .expect("entries lock poisoned")
            .iter()
            .any(|entry| entry.level == level && entry.message == message)
    }

    /// Number of captured entries at the given level.
    pub fn count_entries(&self, level: Level) -> usize {
        self.entries
            .read()
            .expect("entries lock poisoned")
            .iter()
            .filter(|entry| entry.level == level)
            .count()
    }

    /// The most recent entry, if any.
    pub fn last_entry(&self) -> Option<CapturedEntry> {
        self.entries
            .read()
            .expect("entries lock poisoned")
            .last()
            .cloned()
    }

    /// Discard all captured entries.
    pub fn reset(&self) {
        self.entries
            .write()
            .expect("entries lock poisoned")
            .clear();
    }
}

impl Logger for MockLogger {
    fn trace(&self, msg: &str, kvs: &[Value]) {
        self.record(Level::Trace, msg, kvs);
    }

    fn debug(&self, msg: &str, kvs: &[Value]) {
        self.record(Level::Debug, msg, kvs);
    }

    fn info(&self, msg: &str, kvs: &[Value]) {
        self.record(Level::Info, msg, kvs);
    }

    fn warn(&self, msg: &str, kvs: &[Value]) {
        self.record(Level::Warn, msg, kvs);
    }

    fn error(&self, msg: &str, kvs: &[Value]) {
        self.record(Level::Error, msg, kvs);
    }

    // Captured like any other level; the test double never exits.
    fn fatal(&self, msg: &str, kvs: &[Value]) {
        self.record(Level::Fatal, msg, kvs);
    }

    fn with(&self, key: &str, value: Value) -> Arc<dyn Logger> {
        let mut attrs = self.attrs.clone();
        attrs.push((key.to_string(), value));
        Arc::new(MockLogger {
            entries: Arc::clone(&self.entries),
            attrs,
            group: self.group.clone(),
        })
    }

    fn with_group(&self, group: &str) -> Arc<dyn Logger> {
        Arc::new(MockLogger {
            entries: Arc::clone(&self.entries),
            attrs: self.attrs.clone(),
            group: group.to_string(),
        })
    }
}

impl fmt::Display for MockLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries = self.entries();
        if entries.is_empty() {
            return f.write_str("No log entries");
        }

        writeln!(f, "Log entries ({}):", entries.len())?;
        for (i, entry) in entries.iter().enumerate() {
            write!(f, "  [{}] {}: {}", i, entry.level, entry.message)?;
            if !entry.group.is_empty() {
                write!(f, " [group={}]", entry.group)?;
            }
            if !entry.attrs.is_empty() {
                write!(f, " attrs={:?}", entry.attrs)?;
            }
            if !entry.kvs.is_empty() {
                write!(f, " kvs={:?}", entry.kvs)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kvs;
    use serde_json::json;

    #[test]
    fn captures_level_message_and_kvs() {
        let mock = MockLogger::new();
        mock.info("server started", kvs!["port", 8080]);

        assert!(mock.has_entry(Level::Info, "server started"));
        let entry = mock.last_entry().unwrap();
        assert_eq!(entry.kvs, vec![json!("port"), json!(8080)]);
        assert!(entry.attrs.is_empty());
        assert!(entry.group.is_empty());
    }

    #[test]
    fn count_and_reset() {
        let mock = MockLogger::new();
        mock.warn("a", kvs![]);
        mock.warn("b", kvs![]);
        mock.error("c", kvs![]);

        assert_eq!(mock.count_entries(Level::Warn), 2);
        assert_eq!(mock.count_entries(Level::Error), 1);
        assert_eq!(mock.count_entries(Level::Trace), 0);

        mock.reset();
        assert_eq!(mock.entries().len(), 0);
        assert!(mock.last_entry().is_none());
    }

    #[test]
    fn fatal_is_captured_without_exiting() {
        let mock = MockLogger::new();
        mock.fatal("shutting down", kvs![]);
        assert!(mock.has_entry(Level::Fatal, "shutting down"));
    }

    #[test]
    fn children_share_the_entry_sequence() {
        let root = MockLogger::new();
        let child = root.with("request_id", json!("r-1"));
        child.info("handled", kvs![]);

        // Assertions against the root observe the child's emission.
        assert!(root.has_entry(Level::Info, "handled"));
        assert_eq!(root.last_entry().unwrap().attrs, vec![(
            "request_id".to_string(),
            json!("r-1"),
        )]);
    }

    #[test]
    fn attrs_are_snapshotted_per_entry() {
        let root = MockLogger::new();
        let child = root.with("a", json!(1));
        child.info("first", kvs![]);
        let grandchild = child.with("b", json!(2));
        grandchild.info("second", kvs![]);

        let entries = root.entries();
        assert_eq!(entries[0].attrs, vec![("a".to_string(), json!(1))]);
        assert_eq!(
            entries[1].attrs,
            vec![("a".to_string(), json!(1)), ("b".to_string(), json!(2))]
        );
    }

    #[test]
    fn siblings_do_not_see_each_others_attrs() {
        let root = MockLogger::new();
        let left = root.with("a", json!(1));
        let right = root.with("b", json!(2));
        left.info("left", kvs![]);
        right.info("right", kvs![]);
        root.info("base", kvs![]);

        let entries = root.entries();
        assert_eq!(entries[0].attrs, vec![("a".to_string(), json!(1))]);
        assert_eq!(entries[1].attrs, vec![("b".to_string(), json!(2))]);
        // The base logger's own context is unchanged by its children.
        assert!(entries[2].attrs.is_empty());
    }

    #[test]
    fn with_group_latest_binding_wins() {
        let root = MockLogger::new();
        let inner = root.with_group("outer").with_group("inner");
        inner.info("x", kvs![]);
        assert_eq!(root.last_entry().unwrap().group, "inner");
    }

    #[test]
    fn with_error_binds_error_text() {
        let root = MockLogger::new();
        let err = std::io::Error::new(std::io::ErrorKind::Other, "boom");
        root.with_error(&err).error("failed", kvs![]);
        assert_eq!(
            root.last_entry().unwrap().attrs,
            vec![("error".to_string(), json!("boom"))]
        );
    }

    #[test]
    fn concurrent_emission_is_safe() {
        let root = MockLogger::new();
        let mut handles = Vec::new();
        for i in 0..8 {
            let child = root.with("worker", json!(i));
            handles.push(std::thread::spawn(move || {
                for _ in 0..100 {
                    child.info("tick", kvs![]);
                }
            }));
        }
        // Inspect concurrently; either pre- or post-append state is fine,
        // never a partial entry.
        for _ in 0..100 {
            if let Some(entry) = root.last_entry() {
                assert_eq!(entry.message, "tick");
            }
        }
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(root.count_entries(Level::Info), 800);
    }

    #[test]
    fn display_dumps_entries() {
        let mock = MockLogger::new();
        assert_eq!(mock.to_string(), "No log entries");
        mock.with_group("svc").info("ready", kvs!["port", 8080]);
        let dump = mock.to_string();
        assert!(dump.contains("Log entries (1):"));
        assert!(dump.contains("info: ready"));
        assert!(dump.contains("[group=svc]"));
    }
}
