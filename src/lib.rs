//! Buffered, multi-sink logging front end.

pub mod audit;
pub mod config;
pub mod lifecycle;
pub mod logging;

pub use audit::{AuditLogger, FrontendRequest, FrontendResponse};
pub use config::{Config, LoggingConfig};
pub use logging::global::{app_log_init, app_logger, log_init, set_log_levels};
pub use logging::LogController;
