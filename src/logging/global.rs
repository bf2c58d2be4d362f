//! Process-wide logging entry points.
//!
//! The first touch of [`controller`] installs the startup buffer, so anything
//! logged before configuration is read is kept for replay.

use std::sync::{Arc, OnceLock};

use arc_swap::ArcSwapOption;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::EnvFilter;

use crate::audit::AuditLogger;
use crate::config::LoggingConfig;
use crate::logging::buffer::DEFAULT_CAPACITY;
use crate::logging::controller::{InitSummary, LogController};
use crate::logging::layer::ControllerLayer;
use crate::logging::record::{Severity, SourceLocation};

static CONTROLLER: OnceLock<Arc<LogController>> = OnceLock::new();
static APP_LOGGER: ArcSwapOption<AuditLogger> = ArcSwapOption::const_empty();

/// The process-wide controller, created in the buffering phase on first use.
pub fn controller() -> &'static Arc<LogController> {
    CONTROLLER.get_or_init(|| {
        let controller = Arc::new(LogController::new(DEFAULT_CAPACITY));
        controller.log(
            Severity::Info,
            "Starting prelogging buffer.",
            SourceLocation::caller(module_path!()),
        );
        controller
    })
}

/// Route `tracing` events into the process-wide controller.
///
/// `RUST_LOG` narrows what reaches the controller; the default lets
/// everything from DEBUG up through.
pub fn install() -> Result<(), TryInitError> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "debug".into()))
        .with(ControllerLayer::new(controller().clone()))
        .try_init()
}

/// Build the configured sinks and replay everything logged so far.
pub fn log_init(config: &LoggingConfig, cli_verbose: bool) -> InitSummary {
    controller().log_init(config, cli_verbose)
}

/// Recompute sink thresholds after a verbosity change.
pub fn set_log_levels(verbose: bool) {
    controller().set_log_levels(verbose);
}

/// Install a fresh process-wide audit logger.
pub fn app_log_init() -> Arc<AuditLogger> {
    tracing::debug!("Initializing application logger.");
    let logger = Arc::new(AuditLogger::new(controller().clone()));
    APP_LOGGER.store(Some(logger.clone()));
    logger
}

/// The audit logger installed by [`app_log_init`], if any.
pub fn app_logger() -> Option<Arc<AuditLogger>> {
    APP_LOGGER.load_full()
}
