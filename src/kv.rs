use serde_json::Value;

/// Fold a flat alternating key/value sequence into an ordered attribute
/// list.
///
/// The sequence is walked two elements at a time. A pair whose key is not
/// a string is skipped together with its value, and an unpaired trailing
/// element is dropped. Call order is preserved for everything kept.
pub fn pair(kvs: &[Value]) -> Vec<(String, Value)> {
    let mut attrs = Vec::with_capacity(kvs.len() / 2);
    for pair in kvs.chunks_exact(2) {
        if let Value::String(key) = &pair[0] {
            attrs.push((key.clone(), pair[1].clone()));
        }
    }
    attrs
}

/// Build the flat key/value sequence the [`Logger`] emission methods take.
///
/// Each argument is converted to a [`Value`] via [`json!`], so plain
/// literals, expressions and already-built values all work:
///
/// ```
/// use kvlog::{kvs, Logger, NullLogger};
///
/// let log = NullLogger;
/// log.info("server started", kvs!["port", 8080, "tls", false]);
/// ```
///
/// [`Logger`]: crate::Logger
/// [`Value`]: crate::Value
/// [`json!`]: crate::json
#[macro_export]
macro_rules! kvs {
    () => {
        &[] as &[$crate::Value]
    };
    ($($item:expr),+ $(,)?) => {
        &[$($crate::json!($item)),+]
    };
}
