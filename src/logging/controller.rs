//! Buffer-then-flush orchestration of the root sink set.
//!
//! # States
//! - Buffering: the only root sink is a [`BufferingSink`]
//! - Configured: real sinks are installed; levels may be recomputed
//!
//! # State Transitions
//! ```text
//! new()            → Buffering   (buffer installed, root threshold DEBUG)
//! log_init()       → Configured  (sinks built, swapped in, levels applied, buffer replayed)
//! log_init() again → Configured  (sinks rebuilt from scratch)
//! set_log_levels() → Configured  (thresholds only, sinks untouched)
//! ```
//!
//! # Design Decisions
//! - The sink set is swapped atomically; loggers never see a partial set
//! - Buffers are captured before the swap and drained after it. A record
//!   accepted after the drain by a thread still holding the old set is lost,
//!   so `log_init` belongs to single-threaded startup
//! - Diagnostics about sink construction go through whatever set is current

use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::Arc;

use arc_swap::ArcSwap;
use parking_lot::Mutex;

use crate::config::LoggingConfig;
use crate::logging::buffer::{BufferingSink, DEFAULT_CAPACITY};
use crate::logging::factory::SinkFactory;
use crate::logging::format::LineFormatter;
use crate::logging::policy::LevelPolicy;
use crate::logging::record::{LogRecord, Severity, SourceLocation};
use crate::logging::sink::{Sink, SinkError, SinkKind};

/// One member of the root sink set.
#[derive(Debug, Clone)]
pub enum RootSink {
    Buffer(Arc<BufferingSink>),
    Output(Arc<Sink>),
}

/// Lifecycle phase of a controller.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Buffering = 0,
    Configured = 1,
}

impl From<u8> for Phase {
    fn from(val: u8) -> Self {
        match val {
            0 => Phase::Buffering,
            _ => Phase::Configured,
        }
    }
}

/// Mutable logging state owned by one controller.
#[derive(Debug)]
pub struct LoggingState {
    sinks: ArcSwap<Vec<RootSink>>,
    root_threshold: Severity,
    phase: AtomicU8,
    verbose: AtomicBool,
}

impl LoggingState {
    fn buffering(capacity: usize) -> Self {
        let buffer = Arc::new(BufferingSink::new(capacity));
        Self {
            sinks: ArcSwap::from_pointee(vec![RootSink::Buffer(buffer)]),
            root_threshold: Severity::Debug,
            phase: AtomicU8::new(Phase::Buffering as u8),
            verbose: AtomicBool::new(false),
        }
    }
}

/// What a call to [`LogController::log_init`] did.
#[derive(Debug, Default)]
pub struct InitSummary {
    /// Kinds of the sinks now installed, in engine order.
    pub installed: Vec<SinkKind>,
    /// Engines that produced no sink, with the reason.
    pub failed: Vec<(String, String)>,
    /// Records replayed from startup buffers.
    pub replayed: usize,
    /// Records the startup buffers had to drop.
    pub evicted: u64,
    /// Whether the verbose level table was applied.
    pub verbose: bool,
}

/// Owns the root sink set and performs the switch from buffering to real sinks.
pub struct LogController {
    state: LoggingState,
    factory: SinkFactory,
    init_lock: Mutex<()>,
}

impl LogController {
    /// Create a controller in the buffering phase.
    pub fn new(capacity: usize) -> Self {
        Self::with_factory(capacity, SinkFactory::new())
    }

    pub fn with_factory(capacity: usize, factory: SinkFactory) -> Self {
        Self {
            state: LoggingState::buffering(capacity),
            factory,
            init_lock: Mutex::new(()),
        }
    }

    pub fn phase(&self) -> Phase {
        Phase::from(self.state.phase.load(Ordering::Acquire))
    }

    /// Verbosity last applied to the sinks.
    pub fn verbose(&self) -> bool {
        self.state.verbose.load(Ordering::Relaxed)
    }

    /// Log a message through the current root sink set.
    pub fn log(&self, severity: Severity, message: impl Into<String>, location: SourceLocation) {
        self.dispatch(Arc::new(LogRecord::new(severity, message, location)));
    }

    /// Hand a record to every root sink.
    pub fn dispatch(&self, record: Arc<LogRecord>) {
        if record.severity() < self.state.root_threshold {
            return;
        }
        let sinks = self.state.sinks.load();
        for sink in sinks.iter() {
            match sink {
                RootSink::Buffer(buffer) => buffer.accept(record.clone()),
                RootSink::Output(sink) => sink.emit(&record),
            }
        }
    }

    /// Build the configured sinks, install them and replay buffered records.
    ///
    /// Sink construction failures are logged and skipped; this never fails.
    pub fn log_init(&self, config: &LoggingConfig, cli_verbose: bool) -> InitSummary {
        let _guard = self.init_lock.lock();
        self.note(Severity::Debug, "Initializing logging subsystem.".to_string());

        let formatter = match LineFormatter::new(&config.format) {
            Ok(f) => f,
            Err(e) => {
                self.note(
                    Severity::Error,
                    format!("Invalid log format {:?}: {}. Using the default format.", config.format, e),
                );
                LineFormatter::default()
            }
        };

        self.note(
            Severity::Debug,
            format!("Will use logging engines {:?}", config.engines),
        );
        if config.engines.iter().any(|e| e == "file") {
            self.note(
                Severity::Info,
                format!("Writing log file to {}", config.filename.display()),
            );
        }

        let attempts = self.factory.build(&config.engines, config, Arc::new(formatter));

        let mut summary = InitSummary {
            verbose: config.verbose || cli_verbose,
            ..Default::default()
        };
        let mut new_sinks = Vec::with_capacity(attempts.len());
        for attempt in attempts {
            match attempt.result {
                Ok(sink) => {
                    summary.installed.push(sink.kind());
                    new_sinks.push(Arc::new(sink));
                }
                Err(e) => {
                    let message = match &e {
                        SinkError::UnknownEngine(name) => format!("Unknown logging engine {}", name),
                        other => format!("Unable to create logger {}: {}", attempt.engine, other),
                    };
                    self.note(Severity::Error, message);
                    summary.failed.push((attempt.engine, e.to_string()));
                }
            }
        }

        let buffers: Vec<Arc<BufferingSink>> = self
            .state
            .sinks
            .load()
            .iter()
            .filter_map(|s| match s {
                RootSink::Buffer(b) => Some(b.clone()),
                RootSink::Output(_) => None,
            })
            .collect();

        // Thresholds go on before the swap so no record sees an unleveled sink.
        LevelPolicy::apply(new_sinks.iter().map(|s| &**s), summary.verbose);
        self.state
            .sinks
            .store(Arc::new(new_sinks.into_iter().map(RootSink::Output).collect()));
        self.state.verbose.store(summary.verbose, Ordering::Relaxed);
        self.state.phase.store(Phase::Configured as u8, Ordering::Release);

        for buffer in buffers {
            let drained = buffer.drain();
            summary.evicted += drained.evicted;
            summary.replayed += drained.records.len();
            for record in drained.records {
                self.dispatch(record);
            }
        }

        if summary.evicted > 0 {
            self.note(
                Severity::Warning,
                format!(
                    "Prelogging buffer overflowed; {} early records were dropped.",
                    summary.evicted
                ),
            );
        }

        summary
    }

    /// Reapply the level tables to the installed sinks.
    pub fn set_log_levels(&self, verbose: bool) {
        let sinks = self.state.sinks.load();
        LevelPolicy::apply(
            sinks.iter().filter_map(|s| match s {
                RootSink::Output(sink) => Some(&**sink),
                RootSink::Buffer(_) => None,
            }),
            verbose,
        );
        self.state.verbose.store(verbose, Ordering::Relaxed);
    }

    /// Kinds of the installed output sinks, in order.
    pub fn sink_kinds(&self) -> Vec<SinkKind> {
        self.thresholds().into_iter().map(|(kind, _)| kind).collect()
    }

    /// Current threshold of each installed output sink.
    pub fn thresholds(&self) -> Vec<(SinkKind, Severity)> {
        self.state
            .sinks
            .load()
            .iter()
            .filter_map(|s| match s {
                RootSink::Output(sink) => Some((sink.kind(), sink.threshold())),
                RootSink::Buffer(_) => None,
            })
            .collect()
    }

    /// Number of records currently held in startup buffers.
    pub fn pending(&self) -> usize {
        self.state
            .sinks
            .load()
            .iter()
            .map(|s| match s {
                RootSink::Buffer(b) => b.len(),
                RootSink::Output(_) => 0,
            })
            .sum()
    }

    #[track_caller]
    fn note(&self, severity: Severity, message: String) {
        self.log(severity, message, SourceLocation::caller(module_path!()));
    }
}

impl Default for LogController {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::sink::ConsoleWriter;
    use std::io::{self, Write};

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Captured {
        fn lines(&self) -> Vec<String> {
            String::from_utf8(self.0.lock().clone())
                .unwrap()
                .lines()
                .map(str::to_string)
                .collect()
        }
    }

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn controller(capacity: usize, out: &Captured) -> LogController {
        let out = out.clone();
        let factory = SinkFactory::new()
            .with_console(Arc::new(move || ConsoleWriter::with_stream(Box::new(out.clone()))));
        LogController::with_factory(capacity, factory)
    }

    fn config(verbose: bool) -> LoggingConfig {
        LoggingConfig {
            verbose,
            engines: vec!["stderr".to_string()],
            format: "{level} {message}".to_string(),
            ..Default::default()
        }
    }

    fn here() -> SourceLocation {
        SourceLocation::new("test", None, None)
    }

    #[test]
    fn test_starts_buffering() {
        let out = Captured::default();
        let ctl = controller(10, &out);
        assert_eq!(ctl.phase(), Phase::Buffering);

        ctl.log(Severity::Debug, "early", here());
        assert_eq!(ctl.pending(), 1);
        assert!(out.lines().is_empty());
        assert!(ctl.sink_kinds().is_empty());
    }

    #[test]
    fn test_replay_preserves_order_and_applies_levels() {
        let out = Captured::default();
        let ctl = controller(100, &out);
        ctl.log(Severity::Error, "first", here());
        ctl.log(Severity::Info, "filtered", here());
        ctl.log(Severity::Critical, "second", here());

        let summary = ctl.log_init(&config(false), false);
        assert_eq!(ctl.phase(), Phase::Configured);
        assert_eq!(summary.installed, vec![SinkKind::Console]);
        assert!(summary.replayed >= 3);
        assert_eq!(ctl.pending(), 0);

        assert_eq!(out.lines(), vec!["ERROR first", "CRITICAL second"]);
    }

    #[test]
    fn test_verbose_replay_includes_init_diagnostics() {
        let out = Captured::default();
        let ctl = controller(100, &out);
        ctl.log(Severity::Info, "booting", here());

        ctl.log_init(&config(false), true);

        let lines = out.lines();
        assert_eq!(lines[0], "INFO booting");
        assert_eq!(lines[1], "DEBUG Initializing logging subsystem.");
        assert_eq!(lines[2], "DEBUG Will use logging engines [\"stderr\"]");
    }

    #[test]
    fn test_unknown_engine_is_reported_not_fatal() {
        let out = Captured::default();
        let ctl = controller(100, &out);
        let mut cfg = config(false);
        cfg.engines = vec!["stderr".into(), "bogus".into()];

        let summary = ctl.log_init(&cfg, false);
        assert_eq!(summary.installed, vec![SinkKind::Console]);
        assert_eq!(summary.failed.len(), 1);
        assert_eq!(summary.failed[0].0, "bogus");
        assert_eq!(out.lines(), vec!["ERROR Unknown logging engine bogus"]);
    }

    #[test]
    fn test_overflow_is_announced() {
        let out = Captured::default();
        let ctl = controller(3, &out);
        for i in 0..5 {
            ctl.log(Severity::Error, format!("e{}", i), here());
        }

        // The two init diagnostics push e2 and e3 out as well.
        let summary = ctl.log_init(&config(true), false);
        assert_eq!(summary.evicted, 4);
        assert_eq!(summary.replayed, 3);
        assert_eq!(
            out.lines(),
            vec![
                "ERROR e4",
                "DEBUG Initializing logging subsystem.",
                "DEBUG Will use logging engines [\"stderr\"]",
                "WARNING Prelogging buffer overflowed; 4 early records were dropped.",
            ]
        );
    }

    #[test]
    fn test_set_log_levels_only_touches_thresholds() {
        let out = Captured::default();
        let ctl = controller(10, &out);
        ctl.log_init(&config(false), false);
        assert_eq!(ctl.thresholds(), vec![(SinkKind::Console, Severity::Error)]);

        ctl.set_log_levels(true);
        assert!(ctl.verbose());
        assert_eq!(ctl.thresholds(), vec![(SinkKind::Console, Severity::Debug)]);

        ctl.log(Severity::Debug, "now visible", here());
        assert_eq!(out.lines().last().unwrap(), "DEBUG now visible");
    }

    #[test]
    fn test_second_init_rebuilds_without_replay() {
        let out = Captured::default();
        let ctl = controller(10, &out);
        ctl.log_init(&config(false), false);

        let mut cfg = config(false);
        cfg.engines = vec![];
        let summary = ctl.log_init(&cfg, false);
        assert_eq!(summary.replayed, 0);
        assert!(ctl.sink_kinds().is_empty());
        assert_eq!(ctl.phase(), Phase::Configured);
    }

    #[test]
    fn test_invalid_format_falls_back_to_default() {
        let out = Captured::default();
        let ctl = controller(10, &out);
        let mut cfg = config(false);
        cfg.format = "{oops}".to_string();

        ctl.log_init(&cfg, false);
        let lines = out.lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("ERROR:"));
        assert!(lines[0].contains("Invalid log format"));
    }
}
