use std::sync::{Arc, LazyLock, RwLock};

use crate::logger::Logger;
use crate::null::NullLogger;

static DEFAULT: LazyLock<RwLock<Arc<dyn Logger>>> =
    LazyLock::new(|| RwLock::new(Arc::new(NullLogger)));

/// Install `logger` as the process-wide default.
///
/// Call once during startup, before collaborators grab the handle; it may
/// be called again to reconfigure, but loggers already handed out keep
/// the previous value.
pub fn set_default(logger: Arc<dyn Logger>) {
    *DEFAULT.write().expect("default logger lock poisoned") = logger;
}

/// The process-wide default logger. Discards everything until
/// [`set_default`] installs a live backend.
pub fn default_logger() -> Arc<dyn Logger> {
    DEFAULT.read().expect("default logger lock poisoned").clone()
}
