use std::io::Write;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::handler::{Handler, HandlerError};
use crate::record::{Record, Severity};
use crate::sink::SharedSink;

/// Machine-readable renderer: one self-delimited JSON object per line.
///
/// `{"time": RFC3339, "level": NAME, "msg": ..., <attr>: ..., ...}` with
/// bound attributes first and call-time attributes after, in order. The
/// level name substitutes printable strings for the encodings the generic
/// severity scale has no native name for. Attributes bound while a group
/// path is open nest as sub-objects under the path.
#[derive(Clone)]
pub struct JsonHandler {
    min: Severity,
    sink: SharedSink,
    attrs: Vec<(String, Value)>,
    groups: Vec<String>,
}

impl JsonHandler {
    pub fn new(sink: SharedSink, min: Severity) -> Self {
        JsonHandler {
            min,
            sink,
            attrs: Vec::new(),
            groups: Vec::new(),
        }
    }
}

impl Handler for JsonHandler {
    fn enabled(&self, severity: Severity) -> bool {
        severity >= self.min
    }

    fn handle(&self, record: &Record) -> Result<(), HandlerError> {
        let mut fields = Map::new();
        fields.insert("time".to_string(), Value::String(record.time.to_rfc3339()));
        fields.insert("level".to_string(), Value::String(record.severity.name()));
        fields.insert("msg".to_string(), Value::String(record.message.clone()));

        let attrs = self.attrs.iter().chain(record.attrs.iter());
        if self.groups.is_empty() {
            for (key, value) in attrs {
                fields.insert(key.clone(), value.clone());
            }
        } else {
            // Wrap everything below the open group path in nested objects,
            // innermost first. An empty group contributes no field.
            let mut inner = Map::new();
            for (key, value) in attrs {
                inner.insert(key.clone(), value.clone());
            }
            if !inner.is_empty() {
                let mut nested = Value::Object(inner);
                for name in self.groups[1..].iter().rev() {
                    let mut wrap = Map::new();
                    wrap.insert(name.clone(), nested);
                    nested = Value::Object(wrap);
                }
                fields.insert(self.groups[0].clone(), nested);
            }
        }

        let mut line = serde_json::to_string(&Value::Object(fields))?;
        line.push('\n');

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
