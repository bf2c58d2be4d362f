//! Application (audit) logger for frontend request/response events.

use std::sync::Arc;

use crate::audit::event_id;
use crate::logging::controller::LogController;
use crate::logging::record::{Severity, SourceLocation};

/// Target attached to audit records.
pub const AUDIT_TARGET: &str = "audit";

/// The request half of an audited exchange.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FrontendRequest {
    pub source_ip: String,
    pub method: String,
    pub url: String,
    pub user_agent: String,
    pub user: String,
}

/// The response half of an audited exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrontendResponse {
    pub code: u16,
    pub size: u64,
}

/// Render the single audit line for an exchange.
pub fn format_frontend_entry(
    event_id: &str,
    request: &FrontendRequest,
    response: &FrontendResponse,
) -> String {
    format!(
        "{}-{} {}: {} {} {} {} {}",
        event_id,
        request.source_ip,
        response.code,
        request.method,
        request.url,
        request.user_agent,
        response.size,
        request.user
    )
}

/// Writes machine-readable records of security relevant events.
///
/// Entries go through the regular root sink set at INFO, so they follow
/// whatever sinks and levels are configured.
#[derive(Clone)]
pub struct AuditLogger {
    controller: Arc<LogController>,
}

impl AuditLogger {
    pub fn new(controller: Arc<LogController>) -> Self {
        Self { controller }
    }

    /// Log one frontend request/response pair.
    #[track_caller]
    pub fn write_frontend_entry(
        &self,
        event_id: &str,
        request: &FrontendRequest,
        response: &FrontendResponse,
    ) {
        self.controller.log(
            Severity::Info,
            format_frontend_entry(event_id, request, response),
            SourceLocation::caller(AUDIT_TARGET),
        );
    }

    /// A fresh event id; see [`event_id::new_event_id`].
    pub fn new_event_id(&self, event_time: Option<u64>) -> String {
        event_id::new_event_id(event_time)
    }
}
