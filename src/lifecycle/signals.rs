//! OS signal handling.
//!
//! # Responsibilities
//! - SIGINT (Ctrl-C) ends the daemon
//! - SIGUSR1 flips the command-line verbosity switch
//!
//! # Design Decisions
//! - Uses Tokio's signal handling (async-safe)
//! - On platforms without SIGUSR1 the toggle never fires

use std::io;

/// Stream of verbosity toggle requests.
pub struct VerbosityToggle {
    #[cfg(unix)]
    signal: tokio::signal::unix::Signal,
}

impl VerbosityToggle {
    #[cfg(unix)]
    pub fn new() -> io::Result<Self> {
        use tokio::signal::unix::{signal, SignalKind};
        Ok(Self {
            signal: signal(SignalKind::user_defined1())?,
        })
    }

    #[cfg(not(unix))]
    pub fn new() -> io::Result<Self> {
        Ok(Self {})
    }

    /// Wait for the next toggle request.
    #[cfg(unix)]
    pub async fn recv(&mut self) {
        if self.signal.recv().await.is_none() {
            std::future::pending::<()>().await;
        }
    }

    #[cfg(not(unix))]
    pub async fn recv(&mut self) {
        std::future::pending::<()>().await;
    }
}

/// Resolve when the process is asked to stop.
pub async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}
