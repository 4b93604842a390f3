//! Service-host capability.
//!
//! Platform-conditional service plumbing lives behind this trait: one
//! implementation per target (a native SCM bridge on Windows, an
//! always-interactive stub elsewhere), selected at build or startup time by
//! the `sereno-host` crate instead of via source-level conditionals in the
//! runner.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::error::ServiceError;
use crate::log::Log;
use crate::types::{ControlRequest, ManagerStatus};

/// Capacity of the manager control channel.
pub(crate) const CONTROL_CHANNEL_CAPACITY: usize = 2;

/// Capacity of the report channel. Bounded by the fixed report sequence plus
/// interrogate echoes; sends are best-effort either way.
pub(crate) const REPORT_CHANNEL_CAPACITY: usize = 8;

/// Bridge to a platform service manager.
#[async_trait]
pub trait ServiceHost: Send + Sync {
    /// Determines whether the process is attached to an interactive session.
    ///
    /// # Errors
    /// Returns [`ServiceError::SessionDetection`] if the determination
    /// itself failed. The service runner treats that as interactive.
    fn is_interactive(&self) -> Result<bool, ServiceError>;

    /// Opens the platform logging sink, keyed by the daemon's name.
    ///
    /// # Errors
    /// Returns [`ServiceError::LogSink`] if the sink cannot be opened; the
    /// run aborts before the daemon ever starts.
    fn open_log(&self, name: &str) -> Result<Arc<dyn Log>, ServiceError>;

    /// Registers with the service-control dispatcher and opens the session.
    ///
    /// # Errors
    /// Returns [`ServiceError::Dispatch`] if registration failed.
    async fn register(&self, name: &str) -> Result<ServiceSession, ServiceError>;
}

/// One activation under a service manager: manager-supplied arguments, the
/// inbound control stream and the outbound status-report stream.
pub struct ServiceSession {
    /// Arguments the manager supplied for this activation.
    pub args: Vec<String>,
    /// Control requests from the manager.
    pub control: mpsc::Receiver<ControlRequest>,
    /// Status reports back to the manager.
    pub reports: mpsc::Sender<ManagerStatus>,
}

/// The manager-side ends of a [`ServiceSession`], held by the host bridge
/// (or a test) that impersonates the service manager.
pub struct SessionHandle {
    /// Feeds control requests into the session.
    pub control: mpsc::Sender<ControlRequest>,
    /// Receives the runner's status reports.
    pub reports: mpsc::Receiver<ManagerStatus>,
}

impl ServiceSession {
    /// Creates a session and its manager-side handle.
    #[must_use]
    pub fn new(args: Vec<String>) -> (Self, SessionHandle) {
        let (control_tx, control_rx) = mpsc::channel(CONTROL_CHANNEL_CAPACITY);
        let (report_tx, report_rx) = mpsc::channel(REPORT_CHANNEL_CAPACITY);
        (
            Self {
                args,
                control: control_rx,
                reports: report_tx,
            },
            SessionHandle {
                control: control_tx,
                reports: report_rx,
            },
        )
    }
}
