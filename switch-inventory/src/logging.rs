//! Injected logger handle.
//!
//! Every component receives a [`Logger`] at construction instead of writing
//! to the process-wide `log` facade. The run's entry point decides what sits
//! behind it (an `env_logger::Logger`, a test capture, or the global facade).
//!
//! `Logger` implements [`log::Log`], so call sites use the standard macros
//! with an explicit logger:
//!
//! ```rust
//! use switch_inventory::Logger;
//!
//! let log = Logger::discard();
//! log::info!(logger: log, "collecting from {} device(s)", 3);
//! ```
//!
//! The macros still honor `log::max_level()`, so the entry point sets it to
//! match the injected logger's filter.

use std::fmt;
use std::sync::Arc;

use log::{Log, Metadata, Record};

/// Cloneable handle to a `log::Log` implementation.
#[derive(Clone)]
pub struct Logger {
    inner: Arc<dyn Log>,
}

impl Logger {
    /// Wrap any `log::Log` implementation.
    pub fn new(inner: Arc<dyn Log>) -> Self {
        Self { inner }
    }

    /// Forward to whatever logger is installed in the `log` facade.
    pub fn global() -> Self {
        Self::new(Arc::new(Facade))
    }

    /// A logger that drops everything.
    pub fn discard() -> Self {
        Self::new(Arc::new(Discard))
    }
}

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        self.inner.enabled(metadata)
    }

    fn log(&self, record: &Record<'_>) {
        if self.inner.enabled(record.metadata()) {
            self.inner.log(record);
        }
    }

    fn flush(&self) {
        self.inner.flush();
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger").finish_non_exhaustive()
    }
}

struct Facade;

impl Log for Facade {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        log::logger().enabled(metadata)
    }

    fn log(&self, record: &Record<'_>) {
        log::logger().log(record);
    }

    fn flush(&self) {
        log::logger().flush();
    }
}

struct Discard;

impl Log for Discard {
    fn enabled(&self, _metadata: &Metadata<'_>) -> bool {
        false
    }

    fn log(&self, _record: &Record<'_>) {}

    fn flush(&self) {}
}

#[cfg(test)]
pub(crate) mod capture {
    //! In-memory logger for asserting on emitted records.

    use std::sync::{Arc, Mutex};

    use log::{Level, LevelFilter, Log, Metadata, Record};

    use super::Logger;

    #[derive(Default)]
    pub struct Capture {
        records: Mutex<Vec<(Level, String)>>,
    }

    impl Capture {
        /// A logger recording every level, and the capture behind it.
        pub fn logger() -> (Logger, Arc<Capture>) {
            log::set_max_level(LevelFilter::Trace);
            let capture = Arc::new(Capture::default());
            (Logger::new(capture.clone()), capture)
        }

        pub fn records(&self) -> Vec<(Level, String)> {
            self.records.lock().unwrap().clone()
        }

        pub fn contains(&self, level: Level, needle: &str) -> bool {
            self.records()
                .iter()
                .any(|(l, msg)| *l == level && msg.contains(needle))
        }
    }

    impl Log for Capture {
        fn enabled(&self, _metadata: &Metadata<'_>) -> bool {
            true
        }

        fn log(&self, record: &Record<'_>) {
            self.records
                .lock()
                .unwrap()
                .push((record.level(), record.args().to_string()));
        }

        fn flush(&self) {}
    }
}
