//! Windows Service Control Manager host.
//!
//! Intended to run inside the service entry the SCM dispatched: the binary
//! wires `define_windows_service!` / `service_dispatcher::start` from the
//! `windows-service` crate and calls [`crate::run`] from its service main.
//! Started from an interactive console instead, session detection reports
//! interactive and the runner falls back to console mode.

use std::ffi::OsStr;
use std::os::windows::ffi::OsStrExt;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use windows_service::service::{
    ServiceControl, ServiceControlAccept, ServiceExitCode, ServiceState, ServiceStatus,
    ServiceType,
};
use windows_service::service_control_handler::{self, ServiceControlHandlerResult};
use windows_sys::Win32::System::EventLog::{
    DeregisterEventSource, EVENTLOG_ERROR_TYPE, EVENTLOG_INFORMATION_TYPE, RegisterEventSourceW,
    ReportEventW,
};
use windows_sys::Win32::System::RemoteDesktop::ProcessIdToSessionId;
use windows_sys::Win32::System::Threading::GetCurrentProcessId;

use sereno_core::{
    AcceptedControls, ControlRequest, Log, ManagerState, ManagerStatus, ServiceError, ServiceHost,
    ServiceSession, SessionHandle,
};

/// Service host backed by the Windows Service Control Manager.
#[derive(Debug, Default)]
pub struct ScmHost;

impl ScmHost {
    /// Creates an SCM host.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ServiceHost for ScmHost {
    fn is_interactive(&self) -> Result<bool, ServiceError> {
        let mut session_id: u32 = 0;
        let ok = unsafe { ProcessIdToSessionId(GetCurrentProcessId(), &mut session_id) };
        if ok == 0 {
            return Err(ServiceError::session_detection(format!(
                "ProcessIdToSessionId failed: {}",
                std::io::Error::last_os_error()
            )));
        }
        // Services run in session 0; interactive logons do not.
        Ok(session_id != 0)
    }

    fn open_log(&self, name: &str) -> Result<Arc<dyn Log>, ServiceError> {
        let source = wide(name);
        let handle = unsafe { RegisterEventSourceW(std::ptr::null(), source.as_ptr()) };
        if handle.is_null() {
            return Err(ServiceError::log_sink(format!(
                "RegisterEventSourceW({name}) failed: {}",
                std::io::Error::last_os_error()
            )));
        }
        Ok(Arc::new(EventLog { handle }))
    }

    async fn register(&self, name: &str) -> Result<ServiceSession, ServiceError> {
        let args: Vec<String> = std::env::args().skip(1).collect();
        let (session, handle) = ServiceSession::new(args);
        let SessionHandle {
            control,
            mut reports,
        } = handle;

        // The manager-side view of the last report, echoed on Interrogate.
        let current = Arc::new(Mutex::new(ManagerStatus::start_pending()));

        let echo = Arc::clone(&current);
        let handler = move |request: ServiceControl| -> ServiceControlHandlerResult {
            let mapped = match request {
                ServiceControl::Interrogate => {
                    let current = echo
                        .lock()
                        .map(|status| *status)
                        .unwrap_or_else(|_| ManagerStatus::start_pending());
                    ControlRequest::Interrogate { current }
                }
                ServiceControl::Stop => ControlRequest::Stop,
                ServiceControl::Shutdown => ControlRequest::Shutdown,
                other => ControlRequest::Other(other.raw_service_control_type()),
            };
            // A full buffer only ever drops a duplicate request.
            let _ = control.try_send(mapped);
            ServiceControlHandlerResult::NoError
        };

        let status_handle = service_control_handler::register(name, handler)
            .map_err(|err| ServiceError::dispatch(err.to_string()))?;

        // Pump runner reports into SetServiceStatus until the final Stopped.
        tokio::spawn(async move {
            while let Some(report) = reports.recv().await {
                if let Ok(mut guard) = current.lock() {
                    *guard = report;
                }
                if let Err(err) = status_handle.set_service_status(to_service_status(report)) {
                    tracing::warn!(error = %err, "SetServiceStatus failed");
                }
                if report.state == ManagerState::Stopped {
                    break;
                }
            }
        });

        Ok(session)
    }
}

fn to_service_status(report: ManagerStatus) -> ServiceStatus {
    ServiceStatus {
        service_type: ServiceType::OWN_PROCESS,
        current_state: match report.state {
            ManagerState::StartPending => ServiceState::StartPending,
            ManagerState::Running => ServiceState::Running,
            ManagerState::StopPending => ServiceState::StopPending,
            ManagerState::Stopped => ServiceState::Stopped,
        },
        controls_accepted: to_controls_accepted(report.accepts),
        exit_code: if report.exit_code == 0 {
            ServiceExitCode::Win32(0)
        } else {
            ServiceExitCode::ServiceSpecific(report.exit_code)
        },
        checkpoint: 0,
        wait_hint: Duration::default(),
        process_id: None,
    }
}

fn to_controls_accepted(accepts: AcceptedControls) -> ServiceControlAccept {
    let mut out = ServiceControlAccept::empty();
    if accepts.contains(AcceptedControls::STOP) {
        out |= ServiceControlAccept::STOP;
    }
    if accepts.contains(AcceptedControls::SHUTDOWN) {
        out |= ServiceControlAccept::SHUTDOWN;
    }
    out
}

fn wide(s: &str) -> Vec<u16> {
    OsStr::new(s).encode_wide().chain(std::iter::once(0)).collect()
}

/// Event-log sink keyed by the service name.
struct EventLog {
    handle: windows_sys::Win32::Foundation::HANDLE,
}

// Event source handles are safe to use from any thread.
unsafe impl Send for EventLog {}
unsafe impl Sync for EventLog {}

impl EventLog {
    fn report(&self, kind: u16, message: &str) {
        let text = wide(message);
        let strings = [text.as_ptr()];
        unsafe {
            ReportEventW(
                self.handle,
                kind,
                0,
                0,
                std::ptr::null_mut(),
                1,
                0,
                strings.as_ptr(),
                std::ptr::null(),
            );
        }
    }
}

impl Log for EventLog {
    fn info(&self, message: &str) {
        self.report(EVENTLOG_INFORMATION_TYPE, message);
    }

    fn fatal(&self, message: &str) {
        self.report(EVENTLOG_ERROR_TYPE, message);
    }
}

impl Drop for EventLog {
    fn drop(&mut self) {
        unsafe {
            DeregisterEventSource(self.handle);
        }
    }
}
