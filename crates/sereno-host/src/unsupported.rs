//! Fallback host for platforms without a service manager.

use std::sync::Arc;

use async_trait::async_trait;

use sereno_core::{Log, ServiceError, ServiceHost, ServiceSession};

/// Host for targets with no service manager.
///
/// Always reports an interactive session, so the service runner delegates to
/// the console runner. Direct service use (`open_log`/`register`) is an
/// error.
#[derive(Debug, Default)]
pub struct UnsupportedHost;

#[async_trait]
impl ServiceHost for UnsupportedHost {
    fn is_interactive(&self) -> Result<bool, ServiceError> {
        // Without a service manager there is no managed session.
        Ok(true)
    }

    fn open_log(&self, _name: &str) -> Result<Arc<dyn Log>, ServiceError> {
        Err(ServiceError::Unsupported)
    }

    async fn register(&self, _name: &str) -> Result<ServiceSession, ServiceError> {
        Err(ServiceError::Unsupported)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_always_interactive() {
        let host = UnsupportedHost;
        assert!(host.is_interactive().unwrap());
    }

    #[test]
    fn test_direct_service_use_is_unsupported() {
        let host = UnsupportedHost;
        assert!(matches!(
            host.open_log("svc"),
            Err(ServiceError::Unsupported)
        ));
        assert!(matches!(
            tokio_test::block_on(host.register("svc")),
            Err(ServiceError::Unsupported)
        ));
    }
}
