use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

/// The minimal contract accepted by every collaborator in this crate.
///
/// Leveled methods take a message plus a flat alternating key/value
/// sequence (`["port", 8080]` style, usually built with [`kvs!`]). A
/// malformed sequence — an unpaired trailing element or a key that is not
/// a string — is tolerated by skipping the offending pair; the message is
/// always emitted. Logging must never hand a new failure mode back to the
/// caller.
///
/// Context methods return a new logger value and leave the receiver
/// untouched, so the same base logger can safely spawn many independent
/// children.
///
/// [`kvs!`]: crate::kvs
pub trait Logger: Send + Sync {
    fn trace(&self, msg: &str, kvs: &[Value]);
    fn debug(&self, msg: &str, kvs: &[Value]);
    fn info(&self, msg: &str, kvs: &[Value]);
    fn warn(&self, msg: &str, kvs: &[Value]);
    fn error(&self, msg: &str, kvs: &[Value]);

    /// Logs and then terminates the process with status 1 on live
    /// backends. The null and capturing backends record only.
    fn fatal(&self, msg: &str, kvs: &[Value]);

    /// Bind a persistent key/value visible in this logger and all loggers
    /// derived from it.
    fn with(&self, key: &str, value: Value) -> Arc<dyn Logger>;

    /// Shorthand for binding the error text under the `error` key.
    fn with_error(&self, err: &dyn std::error::Error) -> Arc<dyn Logger> {
        self.with("error", Value::String(err.to_string()))
    }

    /// Establish a named group for this logger and its descendants.
    fn with_group(&self, group: &str) -> Arc<dyn Logger>;
}

/// Log levels in increasing order of severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
    Fatal,
}

impl Level {
    /// Parse a configured minimum level.
    ///
    /// Accepts `trace`, `debug`, `info`, `warn`/`warning` and `error`,
    /// case-insensitively. Anything else, including the empty string,
    /// falls back to [`Level::Info`] — logging configuration must never
    /// be a hard failure path. `fatal` is deliberately not accepted as a
    /// minimum so configuration can never suppress error output.
    pub fn parse(level: &str) -> Level {
        match level.to_ascii_lowercase().as_str() {
            "trace" => Level::Trace,
            "debug" => Level::Debug,
            "info" => Level::Info,
            "warn" | "warning" => Level::Warn,
            "error" => Level::Error,
            _ => Level::Info,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Trace => "trace",
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Warn => "warn",
            Level::Error => "error",
            Level::Fatal => "fatal",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
