//! Platform event log sink writer.
//!
//! The platform API itself sits behind [`EventLogChannel`]; an embedding
//! application registers an [`EventLogOpener`] with the sink factory. Without
//! one, the `event_log` engine cannot be built.

use std::io;
use std::sync::Arc;

use crate::logging::record::Severity;
use crate::logging::sink::{SinkError, SinkWriter};

/// A handle onto the platform event log for one service.
pub trait EventLogChannel: Send + Sync {
    fn report(&self, severity: Severity, message: &str) -> io::Result<()>;
}

/// Opens a channel registered under a service name.
pub type EventLogOpener =
    Arc<dyn Fn(&str) -> Result<Box<dyn EventLogChannel>, SinkError> + Send + Sync>;

/// Forwards lines to an event log channel.
pub struct EventLogWriter {
    service_name: String,
    channel: Box<dyn EventLogChannel>,
}

impl EventLogWriter {
    pub fn open(opener: Option<&EventLogOpener>, service_name: &str) -> Result<Self, SinkError> {
        let opener = opener.ok_or(SinkError::EventLogUnavailable)?;
        let channel = opener(service_name)?;
        Ok(Self {
            service_name: service_name.to_string(),
            channel,
        })
    }

    pub fn service_name(&self) -> &str {
        &self.service_name
    }
}

impl SinkWriter for EventLogWriter {
    fn write_line(&self, severity: Severity, line: &str) -> io::Result<()> {
        self.channel.report(severity, line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    struct Recorder(Arc<Mutex<Vec<(Severity, String)>>>);

    impl EventLogChannel for Recorder {
        fn report(&self, severity: Severity, message: &str) -> io::Result<()> {
            self.0.lock().push((severity, message.to_string()));
            Ok(())
        }
    }

    #[test]
    fn test_unavailable_without_opener() {
        let err = EventLogWriter::open(None, "svc").err().unwrap();
        assert!(matches!(err, SinkError::EventLogUnavailable));
    }

    #[test]
    fn test_reports_through_channel() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink_seen = seen.clone();
        let opener: EventLogOpener = Arc::new(
            move |service: &str| -> Result<Box<dyn EventLogChannel>, SinkError> {
                assert_eq!(service, "fleet-monitor");
                Ok(Box::new(Recorder(sink_seen.clone())))
            },
        );

        let writer = EventLogWriter::open(Some(&opener), "fleet-monitor").unwrap();
        assert_eq!(writer.service_name(), "fleet-monitor");
        writer.write_line(Severity::Critical, "service stopped").unwrap();

        assert_eq!(
            *seen.lock(),
            vec![(Severity::Critical, "service stopped".to_string())]
        );
    }
}
