//! Log records and severities.

use std::fmt;
use std::path::Path;

use chrono::{DateTime, Utc};

/// Severity of a log record.
///
/// Ordered from most to least permissive so thresholds compare with `>=`.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Debug = 0,
    Info = 1,
    Warning = 2,
    Error = 3,
    Critical = 4,
}

impl Severity {
    /// Upper-case name used in formatted lines.
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Debug => "DEBUG",
            Severity::Info => "INFO",
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
            Severity::Critical => "CRITICAL",
        }
    }
}

impl From<u8> for Severity {
    fn from(val: u8) -> Self {
        match val {
            0 => Severity::Debug,
            1 => Severity::Info,
            2 => Severity::Warning,
            3 => Severity::Error,
            _ => Severity::Critical,
        }
    }
}

impl From<&tracing::Level> for Severity {
    fn from(level: &tracing::Level) -> Self {
        match *level {
            tracing::Level::TRACE | tracing::Level::DEBUG => Severity::Debug,
            tracing::Level::INFO => Severity::Info,
            tracing::Level::WARN => Severity::Warning,
            tracing::Level::ERROR => Severity::Error,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a record was produced.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SourceLocation {
    /// Logical origin, usually the module path.
    pub target: String,
    pub file: Option<String>,
    pub line: Option<u32>,
}

impl SourceLocation {
    pub fn new(target: impl Into<String>, file: Option<&str>, line: Option<u32>) -> Self {
        Self {
            target: target.into(),
            file: file.map(str::to_string),
            line,
        }
    }

    /// Location of the caller, tagged with `target`.
    #[track_caller]
    pub fn caller(target: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self::new(target, Some(location.file()), Some(location.line()))
    }

    /// File stem of the source file, falling back to the target.
    pub fn module(&self) -> &str {
        self.file
            .as_deref()
            .and_then(|f| Path::new(f).file_stem())
            .and_then(|s| s.to_str())
            .unwrap_or(&self.target)
    }
}

/// A single immutable log record.
///
/// The timestamp is taken at creation, so a record replayed after the
/// buffering phase still carries the time it was produced.
#[derive(Debug, Clone)]
pub struct LogRecord {
    timestamp: DateTime<Utc>,
    severity: Severity,
    message: String,
    location: SourceLocation,
}

impl LogRecord {
    pub fn new(severity: Severity, message: impl Into<String>, location: SourceLocation) -> Self {
        Self::at(Utc::now(), severity, message, location)
    }

    /// Create a record with an explicit timestamp.
    pub fn at(
        timestamp: DateTime<Utc>,
        severity: Severity,
        message: impl Into<String>,
        location: SourceLocation,
    ) -> Self {
        Self {
            timestamp,
            severity,
            message: message.into(),
            location,
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn location(&self) -> &SourceLocation {
        &self.location
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Debug < Severity::Info);
        assert!(Severity::Info < Severity::Warning);
        assert!(Severity::Warning < Severity::Error);
        assert!(Severity::Error < Severity::Critical);
    }

    #[test]
    fn test_severity_u8_conversion() {
        for sev in [
            Severity::Debug,
            Severity::Info,
            Severity::Warning,
            Severity::Error,
            Severity::Critical,
        ] {
            assert_eq!(Severity::from(sev as u8), sev);
        }
    }

    #[test]
    fn test_tracing_level_mapping() {
        assert_eq!(Severity::from(&tracing::Level::TRACE), Severity::Debug);
        assert_eq!(Severity::from(&tracing::Level::WARN), Severity::Warning);
        assert_eq!(Severity::from(&tracing::Level::ERROR), Severity::Error);
    }

    #[test]
    fn test_module_from_file_stem() {
        let loc = SourceLocation::new("logfront::config", Some("src/config/loader.rs"), Some(12));
        assert_eq!(loc.module(), "loader");

        let bare = SourceLocation::new("startup", None, None);
        assert_eq!(bare.module(), "startup");
    }
}
