//! Print output routing.
//!
//! The `print` native writes through a handler instead of straight to
//! stdout, so hosts and tests can capture program output. The stdout
//! handler is the default; the buffer handler accumulates lines for
//! inspection.

use parking_lot::Mutex;

/// Destination for `print` output.
pub trait PrintHandler {
    /// Write one line, newline included.
    fn println(&self, msg: &str);

    /// Captured output so far; empty for non-capturing handlers.
    fn get_output(&self) -> String {
        String::new()
    }

    /// Discard captured output, if any.
    fn clear(&self) {}
}

/// Writes lines directly to stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutPrintHandler;

impl PrintHandler for StdoutPrintHandler {
    fn println(&self, msg: &str) {
        println!("{msg}");
    }
}

/// Accumulates lines in memory.
#[derive(Debug, Default)]
pub struct BufferPrintHandler {
    buffer: Mutex<String>,
}

impl BufferPrintHandler {
    pub fn new() -> Self {
        BufferPrintHandler::default()
    }
}

impl PrintHandler for BufferPrintHandler {
    fn println(&self, msg: &str) {
        let mut buffer = self.buffer.lock();
        buffer.push_str(msg);
        buffer.push('\n');
    }

    fn get_output(&self) -> String {
        self.buffer.lock().clone()
    }

    fn clear(&self) {
        self.buffer.lock().clear();
    }
}
