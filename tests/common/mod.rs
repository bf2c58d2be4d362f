//! Shared utilities for integration tests.

use std::io::{self, Write};
use std::sync::Arc;

use logfront::logging::sink::ConsoleWriter;
use logfront::logging::{LogController, SinkFactory};
use parking_lot::Mutex;

/// In-memory stand-in for standard error.
#[derive(Clone, Default)]
pub struct Captured(Arc<Mutex<Vec<u8>>>);

impl Captured {
    #[allow(dead_code)]
    pub fn lines(&self) -> Vec<String> {
        String::from_utf8(self.0.lock().clone())
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }
}

impl Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// A factory whose `stderr` engine writes into `out`.
pub fn capturing_factory(out: &Captured) -> SinkFactory {
    let out = out.clone();
    SinkFactory::new().with_console(Arc::new(move || {
        ConsoleWriter::with_stream(Box::new(out.clone()))
    }))
}

/// A buffering controller whose console output lands in `out`.
#[allow(dead_code)]
pub fn capturing_controller(capacity: usize, out: &Captured) -> Arc<LogController> {
    Arc::new(LogController::with_factory(capacity, capturing_factory(out)))
}
