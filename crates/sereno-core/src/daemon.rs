//! The daemon lifecycle contract.
//!
//! Every daemon follows the same contract regardless of which runner drives
//! it: start promptly, stop idempotently, and push a status notification
//! after every transition.

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::error::DaemonError;
use crate::types::Status;

/// Buffered capacity of a status channel: one intermediate plus one terminal
/// value in flight. A full buffer drops the new value — a duplicate status
/// carries no new information, and the producer must never block.
pub(crate) const STATUS_CHANNEL_CAPACITY: usize = 2;

/// A long-running background task driven by a runner.
///
/// # Implementation Guidelines
///
/// 1. **start**: Must not block — return quickly and do the real work on
///    daemon-owned tasks. Must be idempotent: starting a started daemon has
///    no side effect. On failure, observable state must be unchanged from
///    before the call.
///
/// 2. **stop**: Must be idempotent: stopping a stopped daemon has no side
///    effect. Must eventually bring the status to [`Status::Stopped`].
///
/// 3. **status**: Synchronous snapshot; safe to call concurrently with
///    `start`/`stop`.
///
/// 4. **set_status_sender**: Single slot, last write wins. The daemon pushes
///    its status through the installed sender after *every* transition; the
///    runner relies on at least one notification per transition to avoid
///    missing terminal states.
///
/// Contract invariant: between `start` returning `Ok` and the next status
/// notification, the status is `Running` or later; a failed `start` is never
/// followed by a `Running` notification.
///
/// # Example
///
/// ```rust,ignore
/// use sereno_core::{Daemon, DaemonError, Status, StatusSender};
/// use async_trait::async_trait;
///
/// struct MyDaemon {
///     status: Status,
///     sender: Option<StatusSender>,
/// }
///
/// #[async_trait]
/// impl Daemon for MyDaemon {
///     fn name(&self) -> &str { "my-daemon" }
///
///     async fn start(&mut self, _args: &[String]) -> Result<(), DaemonError> {
///         self.status = Status::Running;
///         if let Some(sender) = &self.sender {
///             sender.send(self.status);
///         }
///         Ok(())
///     }
///
///     async fn stop(&mut self) {
///         self.status = Status::Stopped;
///         if let Some(sender) = &self.sender {
///             sender.send(self.status);
///         }
///     }
///
///     fn status(&self) -> Status { self.status }
///
///     fn set_status_sender(&mut self, sender: StatusSender) {
///         self.sender = Some(sender);
///     }
/// }
/// ```
#[async_trait]
pub trait Daemon: Send + Sync + 'static {
    /// Returns the stable name of this daemon.
    ///
    /// Used for diagnostics and service registration only.
    fn name(&self) -> &str;

    /// Starts the daemon with the given arguments.
    ///
    /// Must not block the caller; real work happens on daemon-owned tasks.
    /// Idempotent on an already-started daemon.
    ///
    /// # Errors
    /// Returns an error if the daemon could not start. On error, the
    /// daemon's observable state is unchanged.
    async fn start(&mut self, args: &[String]) -> Result<(), DaemonError>;

    /// Stops the daemon.
    ///
    /// Idempotent on an already-stopped daemon. Must eventually bring the
    /// status to [`Status::Stopped`].
    async fn stop(&mut self);

    /// Returns the current status.
    fn status(&self) -> Status;

    /// Installs the status notification sender.
    ///
    /// Single slot: installing a new sender replaces any previous one.
    fn set_status_sender(&mut self, sender: StatusSender);
}

/// Non-blocking handle a daemon uses to push status notifications.
///
/// Sends never block the daemon's internal processing: a full buffer drops
/// the value with a trace event. Duplicates are idempotent, so a dropped
/// notification is only ever a coalesced duplicate of one already pending.
#[derive(Clone, Debug)]
pub struct StatusSender {
    tx: mpsc::Sender<Status>,
}

impl StatusSender {
    /// Pushes a status notification to the runner.
    ///
    /// Returns false if the value was dropped (buffer full or runner gone).
    pub fn send(&self, status: Status) -> bool {
        match self.tx.try_send(status) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(status)) => {
                tracing::trace!(status = %status, "status notification coalesced");
                false
            }
            Err(mpsc::error::TrySendError::Closed(status)) => {
                tracing::trace!(status = %status, "status receiver gone, notification dropped");
                false
            }
        }
    }
}

/// Creates a status channel pair for one run.
///
/// The sender goes to the daemon via [`Daemon::set_status_sender`]; the
/// receiver stays with the runner's select loop.
#[must_use]
pub fn status_channel() -> (StatusSender, mpsc::Receiver<Status>) {
    let (tx, rx) = mpsc::channel(STATUS_CHANNEL_CAPACITY);
    (StatusSender { tx }, rx)
}
