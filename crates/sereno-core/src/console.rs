//! Console runner: drives a daemon from a foreground process, with the OS
//! interrupt signal as the external stop trigger.

use tokio::sync::mpsc;

use crate::daemon::{Daemon, status_channel};
use crate::error::RunError;
use crate::log::logger;
use crate::types::{RunId, Status};

/// Capacity of the interrupt channel. A second interrupt arriving before the
/// first is processed carries no new information and is dropped.
const INTERRUPT_CHANNEL_CAPACITY: usize = 1;

/// Runs a daemon in the console, forwarding the process arguments to
/// `start`.
///
/// Blocks until the daemon stops itself, reports an invalid state, or the
/// process receives an interrupt signal.
///
/// # Errors
/// Returns [`RunError::Start`] if `start` fails (the loop is never entered)
/// or [`RunError::InvalidState`] if the daemon reports `Invalid` mid-run.
pub async fn console(d: &mut dyn Daemon) -> Result<(), RunError> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    console_with_args(d, args).await
}

/// Runs a daemon in the console with explicit arguments.
///
/// # Errors
/// Same outcomes as [`console`].
pub async fn console_with_args(d: &mut dyn Daemon, args: Vec<String>) -> Result<(), RunError> {
    let log = logger();
    let run_id = RunId::new();
    let name = d.name().to_string();
    tracing::debug!(daemon = %name, run = %run_id, "console run starting");

    let (interrupt_tx, interrupt_rx) = mpsc::channel(INTERRUPT_CHANNEL_CAPACITY);
    spawn_interrupt_forwarder(interrupt_tx);

    let (status_tx, status_rx) = status_channel();
    d.set_status_sender(status_tx);

    if let Err(err) = d.start(&args).await {
        log.fatal(&format!("{name}: start failed: {err}"));
        return Err(RunError::Start(err));
    }

    let outcome = drive(d, interrupt_rx, status_rx).await;
    match &outcome {
        Ok(()) => log.info(&format!("{name}: stopped")),
        Err(err) => log.fatal(&format!("{name}: {err}")),
    }
    tracing::debug!(daemon = %name, run = %run_id, "console run finished");
    outcome
}

/// The console select loop. Blocks until exactly one terminal event occurs.
///
/// Separated from the setup so tests can drive the interrupt channel
/// directly instead of delivering real signals.
pub(crate) async fn drive(
    d: &mut dyn Daemon,
    mut interrupt_rx: mpsc::Receiver<()>,
    mut status_rx: mpsc::Receiver<Status>,
) -> Result<(), RunError> {
    let mut interrupts_open = true;
    loop {
        tokio::select! {
            interrupt = interrupt_rx.recv(), if interrupts_open => {
                match interrupt {
                    Some(()) => {
                        d.stop().await;
                        return Ok(());
                    }
                    // Forwarder failed to register; run on status events alone.
                    None => interrupts_open = false,
                }
            }
            status = status_rx.recv() => {
                match status {
                    Some(Status::Stopped) => return Ok(()),
                    // A closed status channel means every sender was dropped
                    // without a terminal notification: a contract breach,
                    // handled like an invalid state.
                    Some(Status::Invalid) | None => {
                        d.stop().await;
                        return Err(RunError::InvalidState);
                    }
                    Some(Status::Running) => {}
                }
            }
        }
    }
}

/// Registers interest in the OS interrupt and forwards one notification into
/// the runner's channel. Ctrl-C everywhere, SIGTERM on Unix as well.
fn spawn_interrupt_forwarder(tx: mpsc::Sender<()>) {
    tokio::spawn(async move {
        if wait_for_interrupt().await.is_ok() {
            // A full buffer means an interrupt is already pending; the
            // duplicate is dropped.
            let _ = tx.try_send(());
        }
        // On registration failure the sender drops here, which disables the
        // interrupt branch in the select loop.
    });
}

#[cfg(unix)]
async fn wait_for_interrupt() -> std::io::Result<()> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut term = signal(SignalKind::terminate())?;
    tokio::select! {
        result = tokio::signal::ctrl_c() => result,
        _ = term.recv() => Ok(()),
    }
}

#[cfg(not(unix))]
async fn wait_for_interrupt() -> std::io::Result<()> {
    tokio::signal::ctrl_c().await
}
