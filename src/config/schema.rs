//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::logging::format::DEFAULT_FORMAT;

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct Config {
    /// Logging subsystem settings (`[logging]` table).
    pub logging: LoggingConfig,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Use the verbose level table.
    pub verbose: bool,

    /// Engines to build, in order: `stderr`, `file`, `syslog`, `event_log`.
    pub engines: Vec<String>,

    /// Line template shared by every sink.
    pub format: String,

    /// Service name for the platform event log.
    pub service_name: String,

    /// Syslog endpoint: a socket path or `host:port` for UDP.
    pub syslog_path: String,

    /// Log file path for the `file` engine.
    pub filename: PathBuf,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            verbose: false,
            engines: vec!["stderr".to_string()],
            format: DEFAULT_FORMAT.to_string(),
            service_name: "logfront".to_string(),
            syslog_path: "/dev/log".to_string(),
            filename: PathBuf::from("/var/log/logfront/logfront.log"),
        }
    }
}
