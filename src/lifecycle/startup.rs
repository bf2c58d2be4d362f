//! Startup orchestration.
//!
//! # Responsibilities
//! - Load and validate configuration
//! - Switch logging from the startup buffer to real sinks
//! - Install the application audit logger
//!
//! # Design Decisions
//! - A missing config file means defaults, not failure
//! - An invalid config is fatal, but only after buffered lines are flushed

use std::path::Path;
use std::sync::Arc;

use crate::audit::AuditLogger;
use crate::config::{load_config, Config, ConfigError};
use crate::logging::global;
use crate::logging::record::{Severity, SourceLocation};
use crate::logging::{InitSummary, LogController};

/// Read the config file, falling back to defaults when it does not exist.
pub fn read_config(path: &Path) -> Result<Config, ConfigError> {
    match load_config(path) {
        Ok(config) => {
            tracing::info!(path = %path.display(), "Configuration loaded");
            Ok(config)
        }
        Err(ConfigError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::warn!(path = %path.display(), "Config file not found, using defaults");
            Ok(Config::default())
        }
        Err(e) => Err(e),
    }
}

/// Configure logging for the process and install the audit logger.
///
/// On a config error the default sinks are installed anyway so the
/// buffered startup log reaches stderr before the error is returned.
pub fn bootstrap(
    path: &Path,
    cli_verbose: bool,
) -> Result<(Config, InitSummary, Arc<AuditLogger>), ConfigError> {
    let (config, summary) = configure(global::controller(), path, cli_verbose)?;
    tracing::info!(
        sinks = ?summary.installed,
        replayed = summary.replayed,
        verbose = summary.verbose,
        "Logging configured"
    );
    let audit = global::app_log_init();
    Ok((config, summary, audit))
}

/// Read the config at `path` and run `log_init` on `controller`.
///
/// A config that fails to load still flushes the buffer through the
/// default sinks before the error is handed back.
pub fn configure(
    controller: &LogController,
    path: &Path,
    cli_verbose: bool,
) -> Result<(Config, InitSummary), ConfigError> {
    match read_config(path) {
        Ok(config) => {
            let summary = controller.log_init(&config.logging, cli_verbose);
            Ok((config, summary))
        }
        Err(e) => {
            controller.log(
                Severity::Error,
                format!("Failed to load config {}: {}", path.display(), e),
                SourceLocation::caller(module_path!()),
            );
            controller.log_init(&Config::default().logging, cli_verbose);
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::sink::{ConsoleWriter, SinkKind};
    use crate::logging::SinkFactory;
    use parking_lot::Mutex;
    use std::io::{self, Write};

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Captured {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().clone()).unwrap()
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

    fn controller(out: &Captured) -> LogController {
        let out = out.clone();
        let factory = SinkFactory::new()
            .with_console(Arc::new(move || ConsoleWriter::with_stream(Box::new(out.clone()))));
        LogController::with_factory(100, factory)
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = read_config(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.logging, Config::default().logging);
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("logfront.toml");
        std::fs::write(&path, "[logging\nengines = ").unwrap();

        let err = read_config(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_bad_config_still_flushes_through_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("logfront.toml");
        std::fs::write(&path, "[logging\nengines = ").unwrap();

        let out = Captured::default();
        let controller = controller(&out);
        controller.log(
            Severity::Critical,
            "before config",
            SourceLocation::new("test", None, None),
        );

        let err = configure(&controller, &path, false).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert_eq!(controller.sink_kinds(), vec![SinkKind::Console]);
        assert_eq!(controller.pending(), 0);

        let text = out.text();
        assert!(text.contains("before config"));
        assert!(text.contains("Failed to load config"));
    }

    #[test]
    fn test_good_config_is_installed() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("logfront.toml");
        std::fs::write(&path, "[logging]\nengines = [\"stderr\"]\nverbose = true\n").unwrap();

        let out = Captured::default();
        let controller = controller(&out);
        let (config, summary) = configure(&controller, &path, false).unwrap();

        assert!(config.logging.verbose);
        assert!(summary.verbose);
        assert_eq!(summary.installed, vec![SinkKind::Console]);
    }
}
