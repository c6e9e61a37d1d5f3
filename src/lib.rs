pub mod console;
pub mod global;
pub mod handler;
pub mod json;
pub mod kv;
pub mod logger;
pub mod mock;
pub mod null;
pub mod record;
pub mod sink;
pub mod structured;

#[cfg(feature = "bridge")]
pub mod bridge;

pub use logger::{Level, Logger};
pub use null::NullLogger;
pub use structured::{Config, StructuredLogger};

// Re-exported so kvs![] expansions resolve against this crate.
pub use serde_json::{json, Value};
