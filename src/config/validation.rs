//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check the line template parses
//! - Check engine-specific settings that are cheap to verify up front
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Unknown engine names are not errors here; the sink factory reports and skips them
//! - Runs before config is accepted into the system

use std::fmt;

use crate::config::schema::Config;
use crate::logging::format::{FormatError, LineFormatter};
use crate::logging::sink::SyslogTarget;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Format(FormatError),
    SyslogPath(String),
    EmptyFilename,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::Format(e) => write!(f, "logging.format: {}", e),
            ValidationError::SyslogPath(reason) => write!(f, "logging.syslog_path: {}", reason),
            ValidationError::EmptyFilename => {
                write!(f, "logging.filename: must be set when the file engine is enabled")
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Validate a configuration, collecting every error.
pub fn validate_config(config: &Config) -> Result<(), Vec<ValidationError>> {
    let logging = &config.logging;
    let mut errors = Vec::new();

    if let Err(e) = LineFormatter::new(&logging.format) {
        errors.push(ValidationError::Format(e));
    }

    let uses = |engine: &str| logging.engines.iter().any(|e| e == engine);

    if uses("syslog") {
        if let Err(e) = SyslogTarget::parse(&logging.syslog_path) {
            errors.push(ValidationError::SyslogPath(e.to_string()));
        }
    }

    if uses("file") && logging.filename.as_os_str().is_empty() {
        errors.push(ValidationError::EmptyFilename);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = Config::default();
        config.logging.engines = vec!["file".into(), "syslog".into(), "carrier-pigeon".into()];
        config.logging.format = "{when} {message}".into();
        config.logging.syslog_path = "loghost:abc".into();
        config.logging.filename = PathBuf::new();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(matches!(errors[0], ValidationError::Format(_)));
        assert!(matches!(errors[1], ValidationError::SyslogPath(_)));
        assert_eq!(errors[2], ValidationError::EmptyFilename);
    }

    #[test]
    fn test_unused_engine_settings_are_ignored() {
        let mut config = Config::default();
        config.logging.engines = vec!["stderr".into()];
        config.logging.syslog_path = "loghost:abc".into();
        assert!(validate_config(&config).is_ok());
    }
}
