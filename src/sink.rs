use std::io::Write;
use std::sync::{Arc, Mutex, PoisonError};

/// Byte sink shared by every handler derived from one configuration.
///
/// Handlers format a complete line first and then issue a single
/// `write_all` under the lock, so lines from concurrent loggers never
/// interleave mid-line.
pub type SharedSink = Arc<Mutex<Box<dyn Write + Send>>>;

/// Wrap a writer for shared use by derived handlers.
pub fn shared(writer: Box<dyn Write + Send>) -> SharedSink {
    Arc::new(Mutex::new(writer))
}

/// An in-memory sink.
///
/// Useful for asserting on rendered output in tests and for measuring
/// renderer overhead without real I/O. Clones share the same buffer.
#[derive(Clone, Default)]
pub struct BufferSink {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl BufferSink {
    pub fn new() -> Self {
        BufferSink::default()
    }

    /// Copy of everything written so far.
    pub fn contents(&self) -> Vec<u8> {
        self.buf
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Everything written so far, as lossy UTF-8.
    pub fn as_string(&self) -> String {
        String::from_utf8_lossy(&self.contents()).into_owned()
    }
}

impl Write for BufferSink {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.buf
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_buffer() {
        let sink = BufferSink::new();
        let mut writer = sink.clone();
        writer.write_all(b"hello\n").unwrap();
        assert_eq!(sink.as_string(), "hello\n");
    }
}
