use std::io::Write;
use std::sync::Arc;

use serde_json::Value;

use crate::handler::{Handler, HandlerError};
use crate::record::{Record, Severity};
use crate::sink::SharedSink;

const DIM: &str = "\x1b[90m";
const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const MAGENTA: &str = "\x1b[35m";
const CYAN: &str = "\x1b[36m";
const RESET: &str = "\x1b[0m";

// Matches the layout "06 Aug 26 15:04 UTC".
const TIME_FORMAT: &str = "%d %b %y %H:%M %Z";

/// Hand-built colorized console renderer.
///
/// One line per record:
/// `<dim timestamp> <colored code> [<group>] <message> key=value ...`
///
/// The group segment is rendered once, from the latest binding of the
/// configured group field (bound attributes win over call-time ones), and
/// the group field itself is skipped when the remaining attributes are
/// rendered. Attributes whose value is an object are flattened, each
/// nested key prefixed with the dot-joined path of enclosing names.
#[derive(Clone)]
pub struct ConsoleHandler {
    min: Severity,
    sink: SharedSink,
    attrs: Vec<(String, Value)>,
    groups: Vec<String>,
    group_field: String,
}

impl ConsoleHandler {
    pub fn new(sink: SharedSink, min: Severity, group_field: impl Into<String>) -> Self {
        ConsoleHandler {
            min,
            sink,
            attrs: Vec::new(),
            groups: Vec::new(),
            group_field: group_field.into(),
        }
    }

    fn group_value(&self, record: &Record) -> Option<String> {
        // Latest binding wins; bound attributes take precedence over
        // call-time ones. At most one group is displayed per line.
        self.attrs
            .iter()
            .rev()
            .find(|(key, _)| *key == self.group_field)
            .or_else(|| {
                record
                    .attrs
                    .iter()
                    .rev()
                    .find(|(key, _)| *key == self.group_field)
            })
            .map(|(_, value)| display_value(value))
    }
}

impl Handler for ConsoleHandler {
    fn enabled(&self, severity: Severity) -> bool {
        severity >= self.min
    }

    fn handle(&self, record: &Record) -> Result<(), HandlerError> {
        let mut line = String::new();

        line.push_str(DIM);
        line.push_str(&record.time.format(TIME_FORMAT).to_string());
        line.push_str(RESET);
        line.push(' ');

        line.push_str(severity_color(record.severity));
        line.push_str(severity_code(record.severity));
        line.push_str(RESET);
        line.push(' ');

        if let Some(group) = self.group_value(record) {
            line.push_str(CYAN);
            line.push('[');
            line.push_str(&group);
            line.push(']');
            line.push_str(RESET);
            line.push(' ');
        }

        line.push_str(&record.message);

        for (key, value) in &self.attrs {
            if *key != self.group_field {
                append_attr(&mut line, key, value, &self.groups);
            }
        }
        for (key, value) in &record.attrs {
            if *key != self.group_field {
                append_attr(&mut line, key, value, &self.groups);
            }
        }

        line.push('\n');

        // Single write per line; keep logging even if another writer
        // panicked while holding the lock.
        let mut sink = self
            .sink
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        sink.write_all(line.as_bytes())?;
        Ok(())
    }

    fn with_attrs(&self, attrs: Vec<(String, Value)>) -> Arc<dyn Handler> {
        let mut handler = self.clone();
        handler.attrs.extend(attrs);
        Arc::new(handler)
    }

    fn with_group(&self, name: &str) -> Arc<dyn Handler> {
        let mut handler = self.clone();
        if !name.is_empty() {
            handler.groups.push(name.to_string());
        }
        Arc::new(handler)
    }
}

fn append_attr(line: &mut String, key: &str, value: &Value, groups: &[String]) {
    // An object value is a nested group of attributes: recurse with the
    // key appended to the path instead of printing the object itself.
    if let Value::Object(fields) = value {
        let mut nested = groups.to_vec();
        nested.push(key.to_string());
        for (name, field) in fields {
            append_attr(line, name, field, &nested);
        }
        return;
    }

    line.push(' ');
    line.push_str(CYAN);
    if !groups.is_empty() {
        line.push_str(&groups.join("."));
        line.push('.');
    }
    line.push_str(key);
    line.push_str(RESET);
    line.push('=');
    line.push_str(&display_value(value));
}

/// Strings render verbatim; everything else renders as JSON text.
fn display_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn severity_color(severity: Severity) -> &'static str {
    match severity {
        Severity::TRACE => MAGENTA,
        Severity::DEBUG | Severity::WARN => YELLOW,
        Severity::INFO => GREEN,
        Severity::ERROR | Severity::FATAL => RED,
        _ => RESET,
    }
}

fn severity_code(severity: Severity) -> &'static str {
    match severity {
        Severity::TRACE => "TRC",
        Severity::DEBUG => "DBG",
        Severity::INFO => "INF",
        Severity::WARN => "WRN",
        Severity::ERROR => "ERR",
        Severity::FATAL => "FTL",
        _ => "???",
    }
}
