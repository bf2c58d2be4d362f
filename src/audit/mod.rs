//! Application audit log.
//!
//! # Data Flow
//! ```text
//! frontend request/response
//!     → event_id.rs (unique id: time, host, pid)
//!     → logger.rs (one formatted line)
//!     → LogController (root sinks, INFO)
//! ```

pub mod event_id;
pub mod logger;

pub use event_id::new_event_id;
pub use logger::{AuditLogger, FrontendRequest, FrontendResponse};
