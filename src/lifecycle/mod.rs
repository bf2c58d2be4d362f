//! Lifecycle management for the daemon.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Install tracing bridge → Load config → LogInit → AppLogInit
//!
//! Signals (signals.rs):
//!     SIGINT → Exit
//!     SIGUSR1 → Toggle verbosity, SetLogLevels
//! ```
//!
//! # Design Decisions
//! - The tracing bridge is installed before anything else can log
//! - A broken config still flushes the startup buffer before exiting

pub mod signals;
pub mod startup;
