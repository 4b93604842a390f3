// Allow unwrap/expect in tests for clear failure messages
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

//! # sereno-core
//!
//! Lifecycle primitives for long-running background processes ("daemons")
//! that run either as an interactive console program or under a platform
//! service manager.
//!
//! The crate provides:
//!
//! - [`Daemon`] — the lifecycle contract every daemon implements
//! - [`Status`] — the daemon's self-reported lifecycle state
//! - [`console`] — a signal-driven runner usable on any platform
//! - [`run_with_host`] — a service-manager-driven runner over a pluggable
//!   [`ServiceHost`]
//! - [`Log`] — a process-wide pluggable sink for lifecycle outcomes
//!
//! Both runners install a [`StatusSender`] on the daemon and own an external
//! control channel (OS interrupt, or manager requests). A single select loop
//! reacts to whichever source fires first and ends in exactly one terminal
//! outcome: a clean stop, or an invalid-state error.
//!
//! ## Example
//!
//! ```rust,ignore
//! use sereno_core::{console, Daemon, Status, StatusSender};
//! use async_trait::async_trait;
//!
//! struct MyDaemon { /* ... */ }
//!
//! #[async_trait]
//! impl Daemon for MyDaemon {
//!     fn name(&self) -> &str { "my-daemon" }
//!     // ... implement start/stop/status/set_status_sender
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod console;
pub mod daemon;
pub mod error;
pub mod host;
pub mod log;
pub mod service;
#[cfg(test)]
pub mod tests;
pub mod types;

pub use console::{console, console_with_args};
pub use daemon::{Daemon, StatusSender, status_channel};
pub use error::{DaemonError, Result, RunError, ServiceError};
pub use host::{ServiceHost, ServiceSession, SessionHandle};
pub use log::{Log, StderrLog, TracingLog, logger, set_logger};
pub use service::run_with_host;
pub use types::{AcceptedControls, ControlRequest, ManagerState, ManagerStatus, RunId, Status};
