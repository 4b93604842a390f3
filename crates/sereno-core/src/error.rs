//! Error types for sereno-core.
//!
//! Three concerns, three enums: [`DaemonError`] is what a daemon reports,
//! [`ServiceError`] is what a service host reports, [`RunError`] is the
//! outcome a runner hands back to its caller.

/// Result type alias for daemon operations.
pub type Result<T> = std::result::Result<T, DaemonError>;

/// Error reported by a daemon implementation.
#[derive(Debug, thiserror::Error)]
pub enum DaemonError {
    /// Configuration problem detected before any work started.
    #[error("configuration error: {0}")]
    Config(String),

    /// Start failed; the daemon's state is unchanged.
    #[error("start failed: {0}")]
    Start(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal error (should not occur in production).
    #[error("internal error: {0}")]
    Internal(String),
}

impl DaemonError {
    /// Creates a configuration error.
    #[must_use]
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates a start error.
    #[must_use]
    pub fn start(msg: impl Into<String>) -> Self {
        Self::Start(msg.into())
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

/// Error reported by a [`crate::ServiceHost`] implementation.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Determining interactive-vs-service mode failed.
    ///
    /// The service runner fails open: detection failure is treated as an
    /// interactive session and the run falls back to the console runner.
    #[error("session detection failed: {0}")]
    SessionDetection(String),

    /// Opening the platform logging sink failed. Fatal to the run, surfaced
    /// before any daemon interaction begins.
    #[error("log sink failed: {0}")]
    LogSink(String),

    /// Registering with or running under the service-control dispatcher
    /// failed.
    #[error("dispatcher error: {0}")]
    Dispatch(String),

    /// The current platform has no service manager.
    #[error("service mode not supported on this platform")]
    Unsupported,

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ServiceError {
    /// Creates a session detection error.
    #[must_use]
    pub fn session_detection(msg: impl Into<String>) -> Self {
        Self::SessionDetection(msg.into())
    }

    /// Creates a log sink error.
    #[must_use]
    pub fn log_sink(msg: impl Into<String>) -> Self {
        Self::LogSink(msg.into())
    }

    /// Creates a dispatcher error.
    #[must_use]
    pub fn dispatch(msg: impl Into<String>) -> Self {
        Self::Dispatch(msg.into())
    }
}

/// Terminal outcome of a `console` or `run` call.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    /// The daemon's `start` returned an error; the run never reached
    /// `Running` and `stop` was never called.
    #[error("daemon start failed: {0}")]
    Start(#[source] DaemonError),

    /// The daemon reported [`crate::Status::Invalid`] mid-run. The runner
    /// forced one `stop` before returning.
    #[error("daemon changed to invalid state")]
    InvalidState,

    /// The service host failed before or around the daemon run.
    #[error("service host error: {0}")]
    Service(#[from] ServiceError),
}

impl RunError {
    /// Service-specific exit code reported to the manager for this outcome.
    ///
    /// 1 for a start failure, 2 for an invalid daemon state. Host errors
    /// never reach the manager in-band; they map to 1 for totality.
    #[must_use]
    pub const fn exit_code(&self) -> u32 {
        match self {
            Self::Start(_) | Self::Service(_) => 1,
            Self::InvalidState => 2,
        }
    }

    /// Returns true if this outcome is a start failure.
    #[must_use]
    pub const fn is_start_failure(&self) -> bool {
        matches!(self, Self::Start(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_daemon_error_display() {
        let err = DaemonError::start("port in use");
        assert_eq!(err.to_string(), "start failed: port in use");
    }

    #[test]
    fn test_service_error_display() {
        let err = ServiceError::log_sink("event log unavailable");
        assert_eq!(err.to_string(), "log sink failed: event log unavailable");
        assert_eq!(
            ServiceError::Unsupported.to_string(),
            "service mode not supported on this platform"
        );
    }

    #[test]
    fn test_run_error_exit_codes() {
        assert_eq!(RunError::Start(DaemonError::start("x")).exit_code(), 1);
        assert_eq!(RunError::InvalidState.exit_code(), 2);
        assert_eq!(RunError::Service(ServiceError::Unsupported).exit_code(), 1);
    }

    #[test]
    fn test_run_error_preserves_start_source() {
        let err = RunError::Start(DaemonError::start("port in use"));
        assert!(err.is_start_failure());
        assert!(err.to_string().contains("port in use"));
    }
}
