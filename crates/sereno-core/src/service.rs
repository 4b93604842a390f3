//! Service runner: drives a daemon under a platform service manager,
//! translating manager control requests and daemon status notifications into
//! manager status reports.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::console::console;
use crate::daemon::{Daemon, status_channel};
use crate::error::RunError;
use crate::host::{ServiceHost, ServiceSession};
use crate::log::{Log, set_logger};
use crate::types::{AcceptedControls, ControlRequest, ManagerStatus, RunId, Status};

/// Runs a daemon under the given service host, falling back to the console
/// runner when the process is attached to an interactive session.
///
/// Session-detection failure is treated as interactive: a service-only API
/// is unusable outside a managed session, so a misconfigured environment
/// degrades to the console runner instead of aborting.
///
/// # Errors
/// Returns [`RunError::Service`] if the host's log sink or dispatcher
/// registration failed (before the daemon ever starts), otherwise the same
/// outcomes as [`console`].
pub async fn run_with_host(d: &mut dyn Daemon, host: &dyn ServiceHost) -> Result<(), RunError> {
    let interactive = match host.is_interactive() {
        Ok(interactive) => interactive,
        Err(err) => {
            tracing::warn!(error = %err, "session detection failed, assuming interactive");
            true
        }
    };
    if interactive {
        return console(d).await;
    }

    let name = d.name().to_string();

    let sink = host.open_log(&name)?;
    // The runner writes through the sink it opened; the process-wide slot is
    // set for the application's benefit (first write wins, and in service
    // mode nothing has logged yet in this run).
    set_logger(Arc::clone(&sink));
    sink.info(&format!("{name}: starting"));

    let session = match host.register(&name).await {
        Ok(session) => session,
        Err(err) => {
            sink.fatal(&format!("{name}: service start failed: {err}"));
            return Err(RunError::Service(err));
        }
    };

    let outcome = execute(d, session, sink.as_ref()).await;
    match &outcome {
        Ok(()) => sink.info(&format!("{name}: service stopped")),
        Err(err) => sink.fatal(&format!("{name}: {err}")),
    }
    outcome
}

/// The execute handler: runs once per service activation.
///
/// State machine over manager status reports — `StartPending` is emitted
/// before `start`, `Running` only on start success, and the exit sequence
/// (`StopPending` → `stop()` → `Stopped`) executes exactly once, reached
/// from either a terminal daemon status or a manager stop request. Both
/// event sources feed one unbiased select; when both are pending, either may
/// win, and only the recorded exit code differs.
pub(crate) async fn execute(
    d: &mut dyn Daemon,
    session: ServiceSession,
    log: &dyn Log,
) -> Result<(), RunError> {
    let ServiceSession {
        args,
        mut control,
        reports,
    } = session;
    let run_id = RunId::new();
    let name = d.name().to_string();
    tracing::debug!(daemon = %name, run = %run_id, "service run starting");

    report(&reports, ManagerStatus::start_pending());

    let (status_tx, mut status_rx) = status_channel();
    d.set_status_sender(status_tx);

    if let Err(err) = d.start(&args).await {
        // Never emits Running and never calls stop: the daemon's state is
        // unchanged by contract. The final Stopped report is dispatcher
        // bookkeeping, not an exit sequence.
        log.fatal(&format!("{name}: application start failed: {err}"));
        report(&reports, ManagerStatus::stopped(1));
        return Err(RunError::Start(err));
    }

    report(
        &reports,
        ManagerStatus::running(AcceptedControls::STOP | AcceptedControls::SHUTDOWN),
    );

    // Single exit transition: the loop breaks with the exit code, from
    // whichever source fires first.
    let exit_code = loop {
        tokio::select! {
            status = status_rx.recv() => {
                match status {
                    // A closed status channel is a contract breach, handled
                    // like an invalid state.
                    Some(Status::Invalid) | None => {
                        log.fatal(&format!("{name}: invalid state"));
                        break 2;
                    }
                    Some(Status::Stopped) => {
                        log.info(&format!("{name}: stopped by application"));
                        break 0;
                    }
                    Some(Status::Running) => {}
                }
            }
            request = control.recv() => {
                match request {
                    Some(ControlRequest::Interrogate { current }) => {
                        // Echo the manager's current reported status
                        // unchanged, not the daemon's internal status.
                        report(&reports, current);
                    }
                    // Stop and Shutdown are the same graceful stop request.
                    // A closed control channel means the dispatcher is gone;
                    // stop gracefully as well.
                    Some(ControlRequest::Stop | ControlRequest::Shutdown) | None => break 0,
                    Some(ControlRequest::Other(code)) => {
                        log.info(&format!("{name}: unexpected control request: #{code}"));
                    }
                }
            }
        }
    };

    log.info(&format!("{name}: stopping"));
    report(&reports, ManagerStatus::stop_pending());
    d.stop().await;
    report(&reports, ManagerStatus::stopped(exit_code));
    tracing::debug!(daemon = %name, run = %run_id, exit_code, "service run finished");

    if exit_code == 2 {
        Err(RunError::InvalidState)
    } else {
        Ok(())
    }
}

/// Best-effort status report. The manager's absence already surfaces through
/// the closed control channel, so a failed send only gets a trace event.
fn report(reports: &mpsc::Sender<ManagerStatus>, status: ManagerStatus) {
    if let Err(err) = reports.try_send(status) {
        tracing::trace!(error = %err, "status report dropped");
    }
}
