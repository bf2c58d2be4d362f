//! Per-sink severity thresholds.
//!
//! Two fixed tables, selected by the verbosity switch:
//!
//! | sink      | base     | verbose |
//! |-----------|----------|---------|
//! | console   | ERROR    | DEBUG   |
//! | file      | ERROR    | DEBUG   |
//! | event log | CRITICAL | INFO    |
//! | syslog    | CRITICAL | INFO    |

use crate::logging::record::Severity;
use crate::logging::sink::{Sink, SinkKind};

/// Threshold table keyed by sink kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelTable {
    pub console: Severity,
    pub file: Severity,
    pub event_log: Severity,
    pub syslog: Severity,
}

impl LevelTable {
    pub fn threshold(&self, kind: SinkKind) -> Severity {
        match kind {
            SinkKind::Console => self.console,
            SinkKind::File => self.file,
            SinkKind::EventLog => self.event_log,
            SinkKind::Syslog => self.syslog,
        }
    }
}

pub const BASE_LEVELS: LevelTable = LevelTable {
    console: Severity::Error,
    file: Severity::Error,
    event_log: Severity::Critical,
    syslog: Severity::Critical,
};

pub const VERBOSE_LEVELS: LevelTable = LevelTable {
    console: Severity::Debug,
    file: Severity::Debug,
    event_log: Severity::Info,
    syslog: Severity::Info,
};

/// Selects a table and applies it to sinks.
pub struct LevelPolicy;

impl LevelPolicy {
    pub fn table(verbose: bool) -> &'static LevelTable {
        if verbose {
            &VERBOSE_LEVELS
        } else {
            &BASE_LEVELS
        }
    }

    /// Set every sink's threshold from the selected table.
    pub fn apply<'a>(sinks: impl IntoIterator<Item = &'a Sink>, verbose: bool) {
        let table = Self::table(verbose);
        for sink in sinks {
            sink.set_threshold(table.threshold(sink.kind()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    struct Null;

    impl crate::logging::sink::SinkWriter for Null {
        fn write_line(&self, _: Severity, _: &str) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn all_sinks() -> Vec<Sink> {
        SinkKind::ALL
            .iter()
            .map(|kind| Sink::new(*kind, Arc::default(), Box::new(Null)))
            .collect()
    }

    fn thresholds(sinks: &[Sink]) -> Vec<Severity> {
        sinks.iter().map(|s| s.threshold()).collect()
    }

    #[test]
    fn test_base_table() {
        let sinks = all_sinks();
        LevelPolicy::apply(&sinks, false);
        assert_eq!(
            thresholds(&sinks),
            vec![Severity::Error, Severity::Error, Severity::Critical, Severity::Critical]
        );
    }

    #[test]
    fn test_verbose_table() {
        let sinks = all_sinks();
        LevelPolicy::apply(&sinks, true);
        assert_eq!(
            thresholds(&sinks),
            vec![Severity::Debug, Severity::Debug, Severity::Info, Severity::Info]
        );
    }

    #[test]
    fn test_apply_is_idempotent() {
        for verbose in [false, true] {
            let sinks = all_sinks();
            LevelPolicy::apply(&sinks, verbose);
            let once = thresholds(&sinks);
            LevelPolicy::apply(&sinks, verbose);
            assert_eq!(thresholds(&sinks), once);
        }
    }

    #[test]
    fn test_verbose_is_strictly_more_permissive() {
        for kind in SinkKind::ALL {
            assert!(VERBOSE_LEVELS.threshold(kind) < BASE_LEVELS.threshold(kind), "{}", kind);
        }
    }

    #[test]
    fn test_toggle_back_to_base() {
        let sinks = all_sinks();
        LevelPolicy::apply(&sinks, true);
        LevelPolicy::apply(&sinks, false);
        assert_eq!(sinks[0].threshold(), Severity::Error);
    }
}
