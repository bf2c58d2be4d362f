//! Logging subsystem.
//!
//! # Data Flow
//! ```text
//! Process start:
//!     tracing events / LogController::log
//!     → record.rs (LogRecord, timestamped at creation)
//!     → buffer.rs (bounded FIFO, oldest dropped)
//!
//! LogInit (controller.rs):
//!     config → factory.rs (one attempt per engine)
//!     → policy.rs (thresholds by sink kind and verbosity)
//!     → atomic swap of the root sink set
//!     → buffered records replayed through the new sinks
//!
//! Afterwards:
//!     record → sink/*.rs (threshold → format.rs → writer)
//! ```
//!
//! # Design Decisions
//! - Logs are never lost during startup, only bounded
//! - One engine failing to build never stops the others
//! - Logging faults surface as missing lines, never as errors to callers

pub mod buffer;
pub mod controller;
pub mod factory;
pub mod format;
pub mod global;
pub mod layer;
pub mod policy;
pub mod record;
pub mod sink;

pub use buffer::BufferingSink;
pub use controller::{InitSummary, LogController, Phase};
pub use factory::{SinkAttempt, SinkFactory};
pub use format::LineFormatter;
pub use layer::ControllerLayer;
pub use policy::LevelPolicy;
pub use record::{LogRecord, Severity, SourceLocation};
pub use sink::{Sink, SinkError, SinkKind};
