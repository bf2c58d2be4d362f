//! Console sink writer.

use std::io::{self, Write};

use parking_lot::Mutex;

use crate::logging::record::Severity;
use crate::logging::sink::SinkWriter;

/// Writes lines to standard error, or to any other stream handed in.
pub struct ConsoleWriter {
    out: Mutex<Box<dyn Write + Send>>,
}

impl ConsoleWriter {
    /// Writer for the process's standard error.
    pub fn stderr() -> Self {
        Self::with_stream(Box::new(io::stderr()))
    }

    pub fn with_stream(out: Box<dyn Write + Send>) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }
}

impl SinkWriter for ConsoleWriter {
    fn write_line(&self, _severity: Severity, line: &str) -> io::Result<()> {
        let mut out = self.out.lock();
        writeln!(out, "{}", line)?;
        out.flush()
    }
}
