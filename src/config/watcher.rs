//! Config file watcher driving logging hot reload.
//!
//! Only a change to the `[logging]` table is forwarded; rewriting the file
//! with identical logging settings does not rebuild the sink set.

use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Config as NotifyConfig, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::config::loader::load_config;
use crate::config::schema::LoggingConfig;

/// Tracks the logging settings currently in force.
#[derive(Debug)]
pub struct LoggingReload {
    current: LoggingConfig,
}

impl LoggingReload {
    pub fn new(current: LoggingConfig) -> Self {
        Self { current }
    }

    /// Record `candidate` and return it if it differs from what is in force.
    pub fn offer(&mut self, candidate: LoggingConfig) -> Option<LoggingConfig> {
        if candidate == self.current {
            return None;
        }
        self.current = candidate.clone();
        Some(candidate)
    }
}

/// Watches the config file and sends changed `[logging]` tables.
pub struct ConfigWatcher {
    path: PathBuf,
    reload: LoggingReload,
    update_tx: mpsc::UnboundedSender<LoggingConfig>,
}

impl ConfigWatcher {
    /// Create a watcher starting from the logging settings already applied.
    pub fn new(
        path: &Path,
        current: LoggingConfig,
    ) -> (Self, mpsc::UnboundedReceiver<LoggingConfig>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();

        (
            Self {
                path: path.to_path_buf(),
                reload: LoggingReload::new(current),
                update_tx,
            },
            update_rx,
        )
    }

    /// Start watching the file in a background thread.
    ///
    /// Invalid configurations are logged and skipped.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let Self {
            path,
            mut reload,
            update_tx,
        } = self;
        let watched = path.clone();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) if event.kind.is_modify() || event.kind.is_create() => {
                    match load_config(&path) {
                        Ok(config) => match reload.offer(config.logging) {
                            Some(logging) => {
                                tracing::info!(path = %path.display(), "Logging settings changed, rebuilding sinks");
                                let _ = update_tx.send(logging);
                            }
                            None => {
                                tracing::debug!(path = %path.display(), "Config rewritten, logging settings unchanged");
                            }
                        },
                        Err(e) => {
                            tracing::error!("Failed to reload config: {}. Keeping current logging setup.", e);
                        }
                    }
                }
                Ok(_) => {}
                Err(e) => tracing::error!("Watch error: {:?}", e),
            },
            NotifyConfig::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&watched, RecursiveMode::NonRecursive)?;

        tracing::info!(path = %watched.display(), "Config watcher started");
        Ok(watcher)
    }
}
