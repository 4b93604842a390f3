//! Process-wide logger facade.
//!
//! Runners report lifecycle outcomes (start attempt, stop, error) through
//! this facade so an application or a service host can substitute a platform
//! sink (e.g. an OS event log) transparently. Daemons do not depend on it.
//!
//! The slot is write-once: the first [`set_logger`] call wins, and
//! [`logger`] installs a stderr default if nothing was configured. A service
//! bootstrap installs its sink before any logging happens in that run, so
//! first-write-wins preserves the observable replacement behavior while
//! keeping the slot a single assignment that happens-before every read.

use std::sync::{Arc, OnceLock};

/// Pluggable sink for lifecycle-significant messages.
pub trait Log: Send + Sync {
    /// Reports an informational message.
    fn info(&self, message: &str);

    /// Reports a fatal-level message.
    fn fatal(&self, message: &str);
}

static LOGGER: OnceLock<Arc<dyn Log>> = OnceLock::new();

/// Installs the process-wide logger.
///
/// First write wins; returns false if a logger was already installed.
pub fn set_logger(logger: Arc<dyn Log>) -> bool {
    LOGGER.set(logger).is_ok()
}

/// Returns the process-wide logger, installing [`StderrLog`] if none is
/// configured.
#[must_use]
pub fn logger() -> Arc<dyn Log> {
    LOGGER.get_or_init(|| Arc::new(StderrLog)).clone()
}

/// Default sink: plain lines on standard error.
#[derive(Debug, Default)]
pub struct StderrLog;

impl Log for StderrLog {
    fn info(&self, message: &str) {
        eprintln!("{message}");
    }

    fn fatal(&self, message: &str) {
        eprintln!("fatal: {message}");
    }
}

/// Sink that routes facade traffic into `tracing` events.
#[derive(Debug, Default)]
pub struct TracingLog;

impl Log for TracingLog {
    fn info(&self, message: &str) {
        tracing::info!("{message}");
    }

    fn fatal(&self, message: &str) {
        tracing::error!("{message}");
    }
}
