//! Output sinks.
//!
//! # Data Flow
//! ```text
//! LogRecord
//!     → Sink (threshold check)
//!     → LineFormatter (shared template)
//!     → SinkWriter (console / file / syslog / event log)
//! ```
//!
//! # Design Decisions
//! - Sink kind is a closed set fixed at construction; level policy keys on it
//! - Threshold is atomic so levels can be reapplied while other threads log
//! - Each writer serializes its own I/O; a failing write never reaches the caller

pub mod console;
pub mod event_log;
pub mod file;
pub mod syslog;

use std::fmt;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use thiserror::Error;

use crate::logging::format::LineFormatter;
use crate::logging::record::{LogRecord, Severity};

pub use console::ConsoleWriter;
pub use event_log::{EventLogChannel, EventLogOpener, EventLogWriter};
pub use file::FileWriter;
pub use syslog::{SyslogTarget, SyslogWriter};

/// The four sink classes known to the level policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SinkKind {
    Console,
    File,
    EventLog,
    Syslog,
}

impl SinkKind {
    pub const ALL: [SinkKind; 4] = [
        SinkKind::Console,
        SinkKind::File,
        SinkKind::EventLog,
        SinkKind::Syslog,
    ];
}

impl fmt::Display for SinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SinkKind::Console => "console",
            SinkKind::File => "file",
            SinkKind::EventLog => "event_log",
            SinkKind::Syslog => "syslog",
        };
        f.write_str(name)
    }
}

/// Errors raised while constructing a sink.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("unknown logging engine {0}")]
    UnknownEngine(String),

    #[error("invalid syslog address {address}: {reason}")]
    InvalidSyslogAddress { address: String, reason: String },

    #[error("cannot open log file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("event log is not available on this platform")]
    EventLogUnavailable,

    #[error("event log error: {0}")]
    EventLog(String),
}

/// Destination for formatted lines.
pub trait SinkWriter: Send + Sync {
    /// Write one formatted line. `severity` is passed for writers that
    /// encode it out of band (syslog priority, event log type).
    fn write_line(&self, severity: Severity, line: &str) -> io::Result<()>;

    /// Whether write errors should be reported on stderr.
    fn reports_errors(&self) -> bool {
        true
    }
}

/// A live output destination with its own minimum severity.
pub struct Sink {
    kind: SinkKind,
    threshold: AtomicU8,
    formatter: Arc<LineFormatter>,
    writer: Box<dyn SinkWriter>,
}

impl Sink {
    /// Create a sink. It starts fully permissive until a level policy is applied.
    pub fn new(kind: SinkKind, formatter: Arc<LineFormatter>, writer: Box<dyn SinkWriter>) -> Self {
        Self {
            kind,
            threshold: AtomicU8::new(Severity::Debug as u8),
            formatter,
            writer,
        }
    }

    pub fn kind(&self) -> SinkKind {
        self.kind
    }

    pub fn threshold(&self) -> Severity {
        Severity::from(self.threshold.load(Ordering::Relaxed))
    }

    pub fn set_threshold(&self, severity: Severity) {
        self.threshold.store(severity as u8, Ordering::Relaxed);
    }

    pub fn accepts(&self, severity: Severity) -> bool {
        severity >= self.threshold()
    }

    /// Format and write a record if it passes the threshold.
    pub fn emit(&self, record: &LogRecord) {
        if !self.accepts(record.severity()) {
            return;
        }
        let line = self.formatter.format(record);
        if let Err(e) = self.writer.write_line(record.severity(), &line) {
            // A console sink that failed has nowhere else to report to.
            if self.writer.reports_errors() && self.kind != SinkKind::Console {
                report_write_error(&mut io::stderr(), self.kind, &e);
            }
        }
    }
}

/// Best-effort report of a failed sink write. Errors on `out` are ignored.
fn report_write_error(out: &mut dyn Write, kind: SinkKind, err: &io::Error) {
    let _ = writeln!(out, "--- logging error: {} sink failed to write: {}", kind, err);
}

impl fmt::Debug for Sink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sink")
            .field("kind", &self.kind)
            .field("threshold", &self.threshold())
            .finish()
    }
}
