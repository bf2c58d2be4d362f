//! Sink construction from the configured engine list.
//!
//! # Design Decisions
//! - One attempt per engine name, each tagged with its own result
//! - A failing engine never prevents the remaining ones from being built
//! - Every sink from one build shares a single formatter

use std::sync::Arc;

use crate::config::LoggingConfig;
use crate::logging::format::LineFormatter;
use crate::logging::sink::{
    ConsoleWriter, EventLogOpener, EventLogWriter, FileWriter, Sink, SinkError, SinkKind,
    SyslogTarget, SyslogWriter,
};

/// Outcome of building one engine.
#[derive(Debug)]
pub struct SinkAttempt {
    pub engine: String,
    pub result: Result<Sink, SinkError>,
}

/// Builds sinks for engine names.
#[derive(Clone, Default)]
pub struct SinkFactory {
    event_log: Option<EventLogOpener>,
    console: Option<Arc<dyn Fn() -> ConsoleWriter + Send + Sync>>,
}

impl SinkFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the platform event log used by the `event_log` engine.
    pub fn with_event_log(mut self, opener: EventLogOpener) -> Self {
        self.event_log = Some(opener);
        self
    }

    /// Replace standard error as the `stderr` engine's stream.
    pub fn with_console(mut self, make: Arc<dyn Fn() -> ConsoleWriter + Send + Sync>) -> Self {
        self.console = Some(make);
        self
    }

    /// Attempt every engine in order.
    pub fn build(
        &self,
        engines: &[String],
        settings: &LoggingConfig,
        formatter: Arc<LineFormatter>,
    ) -> Vec<SinkAttempt> {
        engines
            .iter()
            .map(|engine| SinkAttempt {
                engine: engine.clone(),
                result: self.build_one(engine, settings, formatter.clone()),
            })
            .collect()
    }

    /// Keep the sinks that were built, in input order.
    pub fn sinks(attempts: Vec<SinkAttempt>) -> Vec<Sink> {
        attempts.into_iter().filter_map(|a| a.result.ok()).collect()
    }

    fn build_one(
        &self,
        engine: &str,
        settings: &LoggingConfig,
        formatter: Arc<LineFormatter>,
    ) -> Result<Sink, SinkError> {
        match engine {
            "stderr" => {
                let writer = match &self.console {
                    Some(make) => make(),
                    None => ConsoleWriter::stderr(),
                };
                Ok(Sink::new(SinkKind::Console, formatter, Box::new(writer)))
            }
            "event_log" => {
                let writer = EventLogWriter::open(self.event_log.as_ref(), &settings.service_name)?;
                Ok(Sink::new(SinkKind::EventLog, formatter, Box::new(writer)))
            }
            "syslog" => {
                let target = SyslogTarget::parse(&settings.syslog_path)?;
                let writer = SyslogWriter::new(target);
                Ok(Sink::new(SinkKind::Syslog, formatter, Box::new(writer)))
            }
            "file" => {
                let writer = FileWriter::open(&settings.filename)?;
                Ok(Sink::new(SinkKind::File, formatter, Box::new(writer)))
            }
            other => Err(SinkError::UnknownEngine(other.to_string())),
        }
    }
}
