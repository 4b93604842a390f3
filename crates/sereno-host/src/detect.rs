//! Host selection.
//!
//! One host per target, chosen at build time. Platforms without a service
//! manager get the always-interactive fallback, so `run` degrades to the
//! console runner instead of failing.

use sereno_core::ServiceHost;

/// Returns the service host for the current target.
#[must_use]
pub fn default_host() -> Box<dyn ServiceHost> {
    #[cfg(windows)]
    {
        Box::new(crate::windows::ScmHost::new())
    }

    #[cfg(not(windows))]
    {
        Box::new(crate::unsupported::UnsupportedHost)
    }
}
