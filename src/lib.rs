//! Sereno: daemon lifecycle runner.
//!
//! One [`Daemon`](sereno_core::Daemon) contract, two drivers: a console
//! runner stopped by the OS interrupt signal, and a service runner driven by
//! the platform service manager. An entry point ([`host::run`]) selects the
//! right one for the current session.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use sereno::prelude::*;
//!
//! // Implement Daemon for your type, then drive it:
//! // sereno::host::run(&mut my_daemon).await
//! ```

pub use sereno_core as core;
pub use sereno_host as host;

/// Prelude module for common imports.
pub mod prelude {
    pub use sereno_core::{
        Daemon, DaemonError, Log, RunError, Status, StatusSender, console, console_with_args,
        logger, set_logger,
    };
    pub use sereno_host::{default_host, run};
}
