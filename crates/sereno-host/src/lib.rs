// Allow unwrap/expect in tests for clear failure messages
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

//! # sereno-host
//!
//! Platform service hosts for the sereno daemon framework.
//!
//! `sereno-core` defines the [`ServiceHost`] capability; this crate provides
//! one implementation per target and the [`run`] entry point that selects
//! the right one:
//!
//! - **Windows**: [`ScmHost`] bridges the Service Control Manager — session
//!   detection, an event-log sink, and a dispatcher bridge that pumps SCM
//!   control codes into the runner and status reports back out.
//! - **Everywhere else**: [`UnsupportedHost`] reports an interactive
//!   session, so [`run`] degrades to the console runner.

#![warn(missing_docs)]

pub mod detect;
pub mod unsupported;

#[cfg(windows)]
pub mod windows;

use sereno_core::{Daemon, RunError, ServiceHost};

pub use detect::default_host;
pub use unsupported::UnsupportedHost;
#[cfg(windows)]
pub use windows::ScmHost;

/// Runs a daemon as a managed service where the platform supports it, or as
/// a console program otherwise.
///
/// Equivalent to `run_with_host(daemon, default_host())`.
///
/// # Errors
/// Same outcomes as [`sereno_core::run_with_host`].
pub async fn run(d: &mut dyn Daemon) -> Result<(), RunError> {
    let host = default_host();
    sereno_core::run_with_host(d, host.as_ref()).await
}

/// Boxed host type returned by [`default_host`].
pub type BoxedHost = Box<dyn ServiceHost>;
