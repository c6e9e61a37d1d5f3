use std::sync::Arc;

use log::kv::{Key, Source, VisitSource};
use serde_json::Value;

use crate::kv;
use crate::logger::{Level, Logger};

/// Forwards the logging contract to a `log`-crate implementation.
///
/// Context accumulated through `with`/`with_group` rides along as
/// structured key/values on every record, ahead of the call-time pairs.
/// The group is represented as a flat `group` field. The `log` scale has
/// no level above error, so `fatal` maps to [`log::Level::Error`], and the
/// bridge terminates the process after flushing the engine.
pub struct LogBridge {
    inner: Arc<dyn log::Log>,
    min: Level,
    context: Vec<(String, Value)>,
}

impl LogBridge {
    /// Wrap an engine. Records below `min` are dropped before the engine
    /// sees them; the engine's own filtering still applies afterwards.
    pub fn new<L>(inner: L, min: Level) -> Self
    where
        L: log::Log + 'static,
    {
        LogBridge {
            inner: Arc::new(inner),
            min,
            context: Vec::new(),
        }
    }

    fn emit(&self, level: Level, msg: &str, kvs: &[Value]) {
        if level < self.min {
            return;
        }
        let call = kv::pair(kvs);
        let source = ContextSource {
            bound: &self.context,
            call: &call,
        };
        self.inner.log(
            &log::Record::builder()
                .level(map_level(level))
                .target("kvlog")
                .args(format_args!("{}", msg))
                .key_values(&source)
                .build(),
        );
    }

    fn derive(&self, key: String, value: Value) -> Arc<dyn Logger> {
        let mut context = self.context.clone();
        context.push((key, value));
        Arc::new(LogBridge {
            inner: Arc::clone(&self.inner),
            min: self.min,
            context,
        })
    }
}

fn map_level(level: Level) -> log::Level {
    match level {
        Level::Trace => log::Level::Trace,
        Level::Debug => log::Level::Debug,
        Level::Info => log::Level::Info,
        Level::Warn => log::Level::Warn,
        Level::Error | Level::Fatal => log::Level::Error,
    }
}

impl Logger for LogBridge {
    fn trace(&self, msg: &str, kvs: &[Value]) {
        self.emit(Level::Trace, msg, kvs);
    }

    fn debug(&self, msg: &str, kvs: &[Value]) {
        self.emit(Level::Debug, msg, kvs);
    }

    fn info(&self, msg: &str, kvs: &[Value]) {
        self.emit(Level::Info, msg, kvs);
    }

    fn warn(&self, msg: &str, kvs: &[Value]) {
        self.emit(Level::Warn, msg, kvs);
    }

    fn error(&self, msg: &str, kvs: &[Value]) {
        self.emit(Level::Error, msg, kvs);
    }

    fn fatal(&self, msg: &str, kvs: &[Value]) {
        self.emit(Level::Fatal, msg, kvs);
        // Give the engine a chance to drain before the process ends.
        self.inner.flush();
        std::process::exit(1);
    }

    fn with(&self, key: &str, value: Value) -> Arc<dyn Logger> {
        self.derive(key.to_string(), value)
    }

    fn with_group(&self, group: &str) -> Arc<dyn Logger> {
        self.derive("group".to_string(), Value::String(group.to_string()))
    }
}

/// Bound context first, call-time pairs after, both in order.
struct ContextSource<'a> {
    bound: &'a [(String, Value)],
    call: &'a [(String, Value)],
}

impl Source for ContextSource<'_> {
    fn visit<'kvs>(
        &'kvs self,
        visitor: &mut dyn VisitSource<'kvs>,
    ) -> Result<(), log::kv::Error> {
        for (key, value) in self.bound.iter().chain(self.call.iter()) {
            visitor.visit_pair(Key::from_str(key), log::kv::Value::from_serde(value))?;
        }
        Ok(())
    }
}
