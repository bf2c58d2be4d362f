//! Line formatting for sink output.
//!
//! A template is parsed once into segments and shared by every sink built
//! from the same configuration.
//!
//! # Placeholders
//! `{timestamp}`, `{level}`, `{target}`, `{module}`, `{file}`, `{line}`,
//! `{message}`, `{pid}`. Literal braces are written as `{{` and `}}`.

use std::fmt::Write as _;

use thiserror::Error;

use crate::logging::record::LogRecord;

/// Template used when the configuration does not provide one.
pub const DEFAULT_FORMAT: &str = "{level}:{timestamp} {module}:{line}] {message}";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S,%3f";

/// Errors raised while parsing a line template.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("unknown placeholder {{{0}}} in log format")]
    UnknownPlaceholder(String),

    #[error("unterminated placeholder at byte {0} in log format")]
    Unterminated(usize),

    #[error("unmatched '}}' at byte {0} in log format")]
    UnmatchedClose(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Field {
    Timestamp,
    Level,
    Target,
    Module,
    File,
    Line,
    Message,
    Pid,
}

impl Field {
    fn parse(name: &str) -> Option<Self> {
        Some(match name {
            "timestamp" => Field::Timestamp,
            "level" => Field::Level,
            "target" => Field::Target,
            "module" => Field::Module,
            "file" => Field::File,
            "line" => Field::Line,
            "message" => Field::Message,
            "pid" => Field::Pid,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Field(Field),
}

/// Renders a [`LogRecord`] into a single line.
#[derive(Debug, Clone)]
pub struct LineFormatter {
    template: String,
    segments: Vec<Segment>,
}

impl LineFormatter {
    /// Parse a template.
    pub fn new(template: &str) -> Result<Self, FormatError> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = template.char_indices().peekable();

        while let Some((pos, c)) = chars.next() {
            match c {
                '{' if matches!(chars.peek(), Some((_, '{'))) => {
                    chars.next();
                    literal.push('{');
                }
                '}' if matches!(chars.peek(), Some((_, '}'))) => {
                    chars.next();
                    literal.push('}');
                }
                '}' => return Err(FormatError::UnmatchedClose(pos)),
                '{' => {
                    let mut name = String::new();
                    let mut closed = false;
                    for (_, c) in chars.by_ref() {
                        if c == '}' {
                            closed = true;
                            break;
                        }
                        name.push(c);
                    }
                    if !closed {
                        return Err(FormatError::Unterminated(pos));
                    }
                    let field = Field::parse(&name).ok_or(FormatError::UnknownPlaceholder(name))?;
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Field(field));
                }
                c => literal.push(c),
            }
        }
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self {
            template: template.to_string(),
            segments,
        })
    }

    /// Render one record. The result carries no trailing newline.
    pub fn format(&self, record: &LogRecord) -> String {
        let mut out = String::with_capacity(self.template.len() + record.message().len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Field(field) => {
                    let location = record.location();
                    // Writing into a String cannot fail.
                    let _ = match field {
                        Field::Timestamp => {
                            write!(out, "{}", record.timestamp().format(TIMESTAMP_FORMAT))
                        }
                        Field::Level => out.write_str(record.severity().as_str()),
                        Field::Target => out.write_str(&location.target),
                        Field::Module => out.write_str(location.module()),
                        Field::File => out.write_str(location.file.as_deref().unwrap_or("?")),
                        Field::Line => match location.line {
                            Some(line) => write!(out, "{}", line),
                            None => out.write_str("?"),
                        },
                        Field::Message => out.write_str(record.message()),
                        Field::Pid => write!(out, "{}", std::process::id()),
                    };
                }
            }
        }
        out
    }
}

impl Default for LineFormatter {
    fn default() -> Self {
        Self {
            template: DEFAULT_FORMAT.to_string(),
            segments: vec![
                Segment::Field(Field::Level),
                Segment::Literal(":".to_string()),
                Segment::Field(Field::Timestamp),
                Segment::Literal(" ".to_string()),
                Segment::Field(Field::Module),
                Segment::Literal(":".to_string()),
                Segment::Field(Field::Line),
                Segment::Literal("] ".to_string()),
                Segment::Field(Field::Message),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::record::{Severity, SourceLocation};
    use chrono::TimeZone;

    fn record() -> LogRecord {
        let ts = chrono::Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 45).unwrap();
        LogRecord::at(
            ts,
            Severity::Warning,
            "disk almost full",
            SourceLocation::new("logfront::sink", Some("src/logging/sink/file.rs"), Some(42)),
        )
    }

    #[test]
    fn test_default_template_matches_parsed() {
        let parsed = LineFormatter::new(DEFAULT_FORMAT).unwrap();
        let default = LineFormatter::default();
        assert_eq!(parsed.format(&record()), default.format(&record()));
        assert_eq!(
            default.format(&record()),
            "WARNING:2024-01-15 10:30:45,000 file:42] disk almost full"
        );
    }

    #[test]
    fn test_escaped_braces() {
        let f = LineFormatter::new("{{{level}}} {message}").unwrap();
        assert_eq!(f.format(&record()), "{WARNING} disk almost full");
    }

    #[test]
    fn test_target_and_file_fields() {
        let f = LineFormatter::new("[{target}] {file}: {message}").unwrap();
        assert_eq!(
            f.format(&record()),
            "[logfront::sink] src/logging/sink/file.rs: disk almost full"
        );
    }

    #[test]
    fn test_rejects_bad_templates() {
        assert_eq!(
            LineFormatter::new("{levle} {message}").unwrap_err(),
            FormatError::UnknownPlaceholder("levle".to_string())
        );
        assert_eq!(
            LineFormatter::new("{message").unwrap_err(),
            FormatError::Unterminated(0)
        );
        assert_eq!(
            LineFormatter::new("a } b").unwrap_err(),
            FormatError::UnmatchedClose(2)
        );
    }
}
