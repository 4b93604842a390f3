//! Status and control vocabulary for daemon runs.
//!
//! Two views of one daemon: [`Status`] is what the daemon reports about
//! itself, [`ManagerStatus`] is what the service runner reports to the
//! platform service manager on its behalf.

use serde::{Deserialize, Serialize};

/// Unique identifier for one runner invocation.
///
/// Minted per `console`/`run` call and attached to diagnostic events so
/// overlapping runs in one process can be told apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(uuid::Uuid);

impl RunId {
    /// Creates a new random run ID.
    #[must_use]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }

    /// Returns the inner UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &uuid::Uuid {
        &self.0
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Daemon self-reported lifecycle state.
///
/// Each value pushed through a [`crate::StatusSender`] supersedes the
/// previous one in the runner's view; no history is retained. The pre-start
/// state stays implicit — runners never query status before `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    /// The daemon has entered a state it cannot recover from.
    Invalid,
    /// The daemon has stopped.
    Stopped,
    /// The daemon is running normally.
    Running,
}

impl Status {
    /// Returns true if this status ends the run when observed by a runner.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Invalid | Self::Stopped)
    }

    /// Returns true if the daemon is active.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        matches!(self, Self::Running)
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Invalid => "invalid",
            Self::Stopped => "stopped",
            Self::Running => "running",
        };
        write!(f, "{name}")
    }
}

/// Service-manager view of the service lifecycle.
///
/// Reports follow a strict order within one run:
/// ```text
/// StartPending → Running → StopPending → Stopped
/// ```
/// A start failure skips straight from `StartPending` to `Stopped`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ManagerState {
    /// Service start is in progress.
    StartPending,
    /// Service is running and accepting controls.
    Running,
    /// Service stop is in progress.
    StopPending,
    /// Service has stopped.
    Stopped,
}

impl ManagerState {
    /// Returns the Windows SCM state code for this state.
    #[must_use]
    pub const fn code(&self) -> u32 {
        match self {
            Self::Stopped => 1,
            Self::StartPending => 2,
            Self::StopPending => 3,
            Self::Running => 4,
        }
    }
}

/// Bitmask of control requests a service declares it accepts.
///
/// Bit values follow the Windows SCM accepted-commands mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcceptedControls(u32);

impl AcceptedControls {
    /// Accepts no controls (pending states).
    pub const NONE: Self = Self(0);
    /// Accepts a stop request.
    pub const STOP: Self = Self(1);
    /// Accepts a shutdown notification.
    pub const SHUTDOWN: Self = Self(4);

    /// Returns the raw bitmask.
    #[must_use]
    pub const fn bits(&self) -> u32 {
        self.0
    }

    /// Returns true if the given controls are all accepted.
    #[must_use]
    pub const fn contains(&self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl std::ops::BitOr for AcceptedControls {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// One status report from the runner to the service manager.
///
/// `exit_code` is carried in-band the way the real SCM status block does;
/// it is meaningful on the final `Stopped` report only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagerStatus {
    /// Reported lifecycle state.
    pub state: ManagerState,
    /// Controls accepted while in this state.
    pub accepts: AcceptedControls,
    /// Service-specific exit code (0 clean, 1 start failure, 2 invalid state).
    pub exit_code: u32,
}

impl ManagerStatus {
    /// Report that the service start is in progress.
    #[must_use]
    pub const fn start_pending() -> Self {
        Self {
            state: ManagerState::StartPending,
            accepts: AcceptedControls::NONE,
            exit_code: 0,
        }
    }

    /// Report that the service is running, accepting the given controls.
    #[must_use]
    pub const fn running(accepts: AcceptedControls) -> Self {
        Self {
            state: ManagerState::Running,
            accepts,
            exit_code: 0,
        }
    }

    /// Report that the service stop is in progress.
    #[must_use]
    pub const fn stop_pending() -> Self {
        Self {
            state: ManagerState::StopPending,
            accepts: AcceptedControls::NONE,
            exit_code: 0,
        }
    }

    /// Report that the service has stopped with the given exit code.
    #[must_use]
    pub const fn stopped(exit_code: u32) -> Self {
        Self {
            state: ManagerState::Stopped,
            accepts: AcceptedControls::NONE,
            exit_code,
        }
    }
}

/// One control request from the service manager.
///
/// Ephemeral — consumed once, not queued beyond the control channel's
/// buffering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlRequest {
    /// Report current status back to the manager. Carries the manager's
    /// current reported status for the echo.
    Interrogate {
        /// The status the manager currently holds for this service.
        current: ManagerStatus,
    },
    /// Graceful stop request.
    Stop,
    /// System shutdown notification; treated identically to `Stop`.
    Shutdown,
    /// An unrecognized control code; logged and ignored.
    Other(u32),
}

impl ControlRequest {
    /// Returns the Windows SCM control code for this request.
    #[must_use]
    pub const fn code(&self) -> u32 {
        match self {
            Self::Stop => 1,
            Self::Interrogate { .. } => 4,
            Self::Shutdown => 5,
            Self::Other(code) => *code,
        }
    }
}
