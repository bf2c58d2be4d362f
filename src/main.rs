//! logfront daemon
//!
//! Buffers everything logged during startup, builds the configured sinks,
//! replays the buffer into them and keeps the sink set in step with the
//! config file.
//!
//! # Architecture Overview
//!
//! ```text
//!   tracing events ──▶ ControllerLayer ──▶ LogController
//!                                              │
//!                 ┌────────────────────────────┴───────────────┐
//!                 │ Buffering                    Configured     │
//!                 │ BufferingSink ──replay──▶ stderr/file/      │
//!                 │                           syslog/event_log  │
//!                 └────────────────────────────────────────────┘
//!   config file ──▶ loader ──▶ LogInit          SIGUSR1 ──▶ SetLogLevels
//! ```

use std::path::PathBuf;

use clap::Parser;

use logfront::config::watcher::ConfigWatcher;
use logfront::lifecycle::signals::{shutdown_signal, VerbosityToggle};
use logfront::lifecycle::startup;
use logfront::logging::global;

#[derive(Parser)]
#[command(name = "logfront")]
#[command(about = "Buffered logging front end with configurable sinks", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "logfront.toml")]
    config: PathBuf,

    /// Use the verbose level table regardless of the config.
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Everything from here on is buffered until LogInit.
    global::install()?;
    tracing::info!("logfront v{} starting", env!("CARGO_PKG_VERSION"));

    let (config, _, _audit) = startup::bootstrap(&cli.config, cli.verbose)?;
    let mut logging = config.logging;
    let mut cli_verbose = cli.verbose;

    let (watcher, mut logging_updates) = ConfigWatcher::new(&cli.config, logging.clone());
    let _watcher = match watcher.run() {
        Ok(w) => Some(w),
        Err(e) => {
            tracing::warn!(path = %cli.config.display(), error = %e, "Config hot reload disabled");
            None
        }
    };

    let mut toggle = VerbosityToggle::new()?;
    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            Some(new_logging) = logging_updates.recv() => {
                let summary = global::log_init(&new_logging, cli_verbose);
                tracing::info!(sinks = ?summary.installed, "Logging reconfigured");
                logging = new_logging;
            }
            _ = toggle.recv() => {
                cli_verbose = !cli_verbose;
                let verbose = logging.verbose || cli_verbose;
                global::set_log_levels(verbose);
                tracing::info!(verbose, "Log levels updated");
            }
            _ = &mut shutdown => break,
        }
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
