use std::io::Write;
use std::sync::Arc;

use serde_json::Value;

use crate::console::ConsoleHandler;
use crate::handler::Handler;
use crate::json::JsonHandler;
use crate::kv;
use crate::logger::{Level, Logger};
use crate::record::{Record, Severity};
use crate::sink;

/// Configuration for [`StructuredLogger::new`].
///
/// Every field is optional. Invalid or empty values degrade to the
/// documented default instead of failing — logger construction must never
/// break a caller's startup sequence.
///
/// **Fields**
/// - `level`: minimum level, `trace|debug|info|warn|error` (default `info`).
/// - `format`: `console` or `json` (default `console`).
/// - `writer`: output byte sink (default stdout).
/// - `group_field_name`: field the group binds under (default `_group`).
#[derive(Default)]
pub struct Config {
    pub level: String,
    pub format: String,
    pub writer: Option<Box<dyn Write + Send>>,
    pub group_field_name: String,
}

/// Logging-contract implementation driving a structured-record [`Handler`].
///
/// Context derivation extends the handler: `with` appends a bound
/// attribute, `with_group` binds the group name as an ordinary attribute
/// under the configured group field, which the console renderer displays
/// as a bracketed segment and the JSON renderer emits as a flat field.
#[derive(Clone)]
pub struct StructuredLogger {
    handler: Arc<dyn Handler>,
    group_field: String,
}

impl StructuredLogger {
    pub fn new(cfg: Config) -> Self {
        let min = Severity::from(Level::parse(&cfg.level));
        let group_field = if cfg.group_field_name.is_empty() {
            "_group".to_string()
        } else {
            cfg.group_field_name
        };
        let writer = cfg
            .writer
            .unwrap_or_else(|| Box::new(std::io::stdout()));
        let sink = sink::shared(writer);

        // Anything other than "json" renders to the console.
        let handler: Arc<dyn Handler> = if cfg.format == "json" {
            Arc::new(JsonHandler::new(sink, min))
        } else {
            Arc::new(ConsoleHandler::new(sink, min, group_field.clone()))
        };

        StructuredLogger {
            handler,
            group_field,
        }
    }

    /// Wire the facade onto a custom handler implementation.
    pub fn with_handler(handler: Arc<dyn Handler>, group_field_name: impl Into<String>) -> Self {
        StructuredLogger {
            handler,
            group_field: group_field_name.into(),
        }
    }

    fn log(&self, severity: Severity, msg: &str, kvs: &[Value]) {
        if !self.handler.enabled(severity) {
            return;
        }
        let record = Record::new(severity, msg, kv::pair(kvs));
        if let Err(err) = self.handler.handle(&record) {
            // Reported once, never retried.
            eprintln!("{}", err);
        }
    }
}

impl Logger for StructuredLogger {
    fn trace(&self, msg: &str, kvs: &[Value]) {
        self.log(Severity::TRACE, msg, kvs);
    }

    fn debug(&self, msg: &str, kvs: &[Value]) {
        self.log(Severity::DEBUG, msg, kvs);
    }

    fn info(&self, msg: &str, kvs: &[Value]) {
        self.log(Severity::INFO, msg, kvs);
    }

    fn warn(&self, msg: &str, kvs: &[Value]) {
        self.log(Severity::WARN, msg, kvs);
    }

    fn error(&self, msg: &str, kvs: &[Value]) {
        self.log(Severity::ERROR, msg, kvs);
    }

    fn fatal(&self, msg: &str, kvs: &[Value]) {
        // The write (or its failure report) completes before the exit.
        self.log(Severity::FATAL, msg, kvs);
        std::process::exit(1);
    }

    fn with(&self, key: &str, value: Value) -> Arc<dyn Logger> {
        Arc::new(StructuredLogger {
            handler: self.handler.with_attrs(vec![(key.to_string(), value)]),
            group_field: self.group_field.clone(),
        })
    }

    fn with_group(&self, group: &str) -> Arc<dyn Logger> {
        Arc::new(StructuredLogger {
            handler: self.handler.with_attrs(vec![(
                self.group_field.clone(),
                Value::String(group.to_string()),
            )]),
            group_field: self.group_field.clone(),
        })
    }
}
