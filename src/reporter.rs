use std::sync::Arc;

use log::Level;

pub const FILE_MANAGEMENT: &str = "File Management";
pub const CPU: &str = "CPU";
pub const SYSTEM_TUNING: &str = "System Tuning";
pub const REPORTS: &str = "Reports";
pub const SCHEDULE: &str = "Schedule";

/// Sink for per-component diagnostics.
///
/// Components never reach for a global logger; they are handed a reporter
/// at construction so tests can swap in a recording or silent one.
pub trait Reporter {
    fn record(&self, level: Level, component: &str, message: &str);

    fn info(&self, component: &str, message: &str) {
        self.record(Level::Info, component, message);
    }

    fn warn(&self, component: &str, message: &str) {
        self.record(Level::Warn, component, message);
    }

    fn error(&self, component: &str, message: &str) {
        self.record(Level::Error, component, message);
    }
}

pub type SharedReporter = Arc<dyn Reporter + Send + Sync>;

/// Forwards records to the `log` facade, using the component as target.
pub struct LogReporter;

impl Reporter for LogReporter {
    fn record(&self, level: Level, component: &str, message: &str) {
        log::log!(target: component, level, "{message}");
    }
}

/// Discards everything.
pub struct NullReporter;

impl Reporter for NullReporter {
    fn record(&self, _level: Level, _component: &str, _message: &str) {}
}

pub fn log_reporter() -> SharedReporter {
    Arc::new(LogReporter)
}

pub fn null_reporter() -> SharedReporter {
    Arc::new(NullReporter)
}

#[cfg(test)]
pub mod testing {
    use super::*;
    use std::sync::Mutex;

    /// Keeps every record in memory for assertions.
    #[derive(Default)]
    pub struct RecordingReporter {
        records: Mutex<Vec<(Level, String, String)>>,
    }

    impl RecordingReporter {
        pub fn shared() -> Arc<Self> {
            Arc::new(Self::default())
        }

        pub fn records(&self) -> Vec<(Level, String, String)> {
            self.records.lock().unwrap().clone()
        }

        pub fn count(&self, level: Level) -> usize {
            self.records().iter().filter(|(l, _, _)| *l == level).count()
        }
    }

    impl Reporter for RecordingReporter {
        fn record(&self, level: Level, component: &str, message: &str) {
            self.records
                .lock()
                .unwrap()
                .push((level, component.to_string(), message.to_string()));
        }
    }
}
