//! Bridge from `tracing` events into a [`LogController`].

use std::fmt::{self, Write as _};
use std::sync::Arc;

use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer};

use crate::logging::controller::LogController;
use crate::logging::record::{Severity, SourceLocation};

/// Field that raises an event to [`Severity::Critical`].
pub const CRITICAL_FIELD: &str = "critical";

/// Layer that turns every event into a log record.
pub struct ControllerLayer {
    controller: Arc<LogController>,
}

impl ControllerLayer {
    pub fn new(controller: Arc<LogController>) -> Self {
        Self { controller }
    }
}

impl<S: Subscriber> Layer<S> for ControllerLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let meta = event.metadata();
        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);

        let severity = if visitor.critical {
            Severity::Critical
        } else {
            Severity::from(meta.level())
        };
        let location = SourceLocation::new(meta.target(), meta.file(), meta.line());
        self.controller.log(severity, visitor.finish(), location);
    }
}

/// Collects the `message` field plus ` key=value` for the rest.
#[derive(Default)]
struct MessageVisitor {
    message: String,
    fields: String,
    critical: bool,
}

impl MessageVisitor {
    fn finish(mut self) -> String {
        if self.message.is_empty() {
            self.fields.trim_start().to_string()
        } else {
            self.message.push_str(&self.fields);
            self.message
        }
    }
}

impl Visit for MessageVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message.push_str(value);
        } else {
            let _ = write!(self.fields, " {}={}", field.name(), value);
        }
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        if field.name() == CRITICAL_FIELD {
            self.critical = value;
        } else {
            let _ = write!(self.fields, " {}={}", field.name(), value);
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.message, "{:?}", value);
        } else {
            let _ = write!(self.fields, " {}={:?}", field.name(), value);
        }
    }
}
