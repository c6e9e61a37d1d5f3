use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::logger::Level;

/// Numeric severity used at the handler layer.
///
/// The named encodings leave gaps so custom levels can slot between them;
/// only the named ones have native names, so renderers substitute
/// printable strings for the rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Severity(pub i16);

impl Severity {
    pub const TRACE: Severity = Severity(-8);
    pub const DEBUG: Severity = Severity(-4);
    pub const INFO: Severity = Severity(0);
    pub const WARN: Severity = Severity(4);
    pub const ERROR: Severity = Severity(8);
    pub const FATAL: Severity = Severity(10);

    /// Printable name: the exact name for a standard encoding, otherwise
    /// the nearest lower name plus an offset, e.g. `INFO+2`.
    pub fn name(self) -> String {
        fn offset(base: &str, delta: i16) -> String {
            if delta == 0 {
                base.to_string()
            } else {
                format!("{}{:+}", base, delta)
            }
        }

        match self.0 {
            n if n < Self::DEBUG.0 => offset("TRACE", n - Self::TRACE.0),
            n if n < Self::INFO.0 => offset("DEBUG", n - Self::DEBUG.0),
            n if n < Self::WARN.0 => offset("INFO", n - Self::INFO.0),
            n if n < Self::ERROR.0 => offset("WARN", n - Self::WARN.0),
            n if n < Self::FATAL.0 => offset("ERROR", n - Self::ERROR.0),
            n => offset("FATAL", n - Self::FATAL.0),
        }
    }
}

impl From<Level> for Severity {
    fn from(level: Level) -> Severity {
        match level {
            Level::Trace => Severity::TRACE,
            Level::Debug => Severity::DEBUG,
            Level::Info => Severity::INFO,
            Level::Warn => Severity::WARN,
            Level::Error => Severity::ERROR,
            Level::Fatal => Severity::FATAL,
        }
    }
}

/// One emission, built once per call and immutable afterwards.
///
/// `attrs` holds the call-time pairs in call order; attributes bound at
/// logger construction live in the handler, not here.
#[derive(Debug, Clone, Serialize)]
pub struct Record {
    pub time: DateTime<Utc>,
    pub severity: Severity,
    pub message: String,
    pub attrs: Vec<(String, Value)>,
}

impl Record {
    pub fn new(severity: Severity, message: impl Into<String>, attrs: Vec<(String, Value)>) -> Self {
        Record {
            time: Utc::now(),
            severity,
            message: message.into(),
            attrs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_encodings_have_exact_names() {
        assert_eq!(Severity::TRACE.name(), "TRACE");
        assert_eq!(Severity::DEBUG.name(), "DEBUG");
        assert_eq!(Severity::INFO.name(), "INFO");
        assert_eq!(Severity::WARN.name(), "WARN");
        assert_eq!(Severity::ERROR.name(), "ERROR");
        assert_eq!(Severity::FATAL.name(), "FATAL");
    }

    #[test]
    fn off_scale_encodings_get_offset_names() {
        assert_eq!(Severity(2).name(), "INFO+2");
        assert_eq!(Severity(-6).name(), "TRACE+2");
        assert_eq!(Severity(9).name(), "ERROR+1");
        assert_eq!(Severity(20).name(), "FATAL+10");
        assert_eq!(Severity(-20).name(), "TRACE-12");
    }

    #[test]
    fn severity_orders_like_levels() {
        assert!(Severity::TRACE < Severity::DEBUG);
        assert!(Severity::ERROR < Severity::FATAL);
        assert!(Severity::from(Level::Warn) == Severity::WARN);
    }
}
