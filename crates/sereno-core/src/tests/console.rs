//! Console runner scenario tests.
//!
//! Loop behavior is exercised through `console::drive` with a test-owned
//! interrupt channel, so no real signals are delivered.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::timeout;

use crate::console::{console_with_args, drive};
use crate::daemon::{Daemon, status_channel};
use crate::error::RunError;
use crate::tests::mocks::MockDaemon;
use crate::types::Status;

const TICK: Duration = Duration::from_secs(1);

#[tokio::test]
async fn test_self_stopping_daemon_returns_ok_without_signal() {
    let mut daemon = MockDaemon::new("self-stop").push_on_start(&[Status::Running, Status::Stopped]);

    let outcome = timeout(TICK, console_with_args(&mut daemon, vec![]))
        .await
        .expect("run should end without any signal");

    assert!(outcome.is_ok());
    // The daemon stopped itself; the runner never calls stop.
    assert_eq!(daemon.stop_count(), 0);
}

#[tokio::test]
async fn test_start_failure_is_returned_verbatim() {
    let mut daemon = MockDaemon::new("bad-port").fail_start("port in use");

    let outcome = console_with_args(&mut daemon, vec![]).await;

    match outcome {
        Err(RunError::Start(err)) => assert!(err.to_string().contains("port in use")),
        other => panic!("expected start failure, got {other:?}"),
    }
    assert_eq!(daemon.start_count(), 1);
    assert_eq!(daemon.stop_count(), 0);
}

#[tokio::test]
async fn test_invalid_state_forces_one_stop() {
    let mut daemon = MockDaemon::new("goes-invalid");
    let (_interrupt_tx, interrupt_rx) = mpsc::channel(1);
    let (sender, status_rx) = status_channel();
    daemon.set_status_sender(sender);
    daemon.start(&[]).await.unwrap();

    let control = daemon.control();
    tokio::spawn(async move {
        control.push(Status::Running);
        control.push(Status::Invalid);
    });

    let outcome = timeout(TICK, drive(&mut daemon, interrupt_rx, status_rx))
        .await
        .expect("run should end on the invalid status");

    assert!(matches!(outcome, Err(RunError::InvalidState)));
    assert_eq!(daemon.stop_count(), 1);
}

#[tokio::test]
async fn test_interrupt_stops_daemon_once() {
    let mut daemon = MockDaemon::new("interrupted");
    let (interrupt_tx, interrupt_rx) = mpsc::channel(1);
    let (sender, status_rx) = status_channel();
    daemon.set_status_sender(sender);
    daemon.start(&[]).await.unwrap();

    interrupt_tx.send(()).await.unwrap();

    let outcome = timeout(TICK, drive(&mut daemon, interrupt_rx, status_rx))
        .await
        .expect("run should end on the interrupt");

    assert!(outcome.is_ok());
    assert_eq!(daemon.stop_count(), 1);
}

#[tokio::test]
async fn test_running_notifications_are_absorbed() {
    let mut daemon = MockDaemon::new("chatty");
    let (_interrupt_tx, interrupt_rx) = mpsc::channel(1);
    let (sender, status_rx) = status_channel();
    daemon.set_status_sender(sender);
    daemon.start(&[]).await.unwrap();

    let control = daemon.control();
    tokio::spawn(async move {
        control.push(Status::Running);
        tokio::task::yield_now().await;
        control.push(Status::Running);
        tokio::task::yield_now().await;
        control.push(Status::Stopped);
    });

    let outcome = timeout(TICK, drive(&mut daemon, interrupt_rx, status_rx))
        .await
        .expect("run should end on the stopped status");

    assert!(outcome.is_ok());
    assert_eq!(daemon.stop_count(), 0);
}

#[tokio::test]
async fn test_interrupt_and_stopped_race_terminates_once() {
    // Both events pending before the loop runs: either branch may win, the
    // outcome is success either way, and stop is called at most once.
    let mut daemon = MockDaemon::new("racy");
    let (interrupt_tx, interrupt_rx) = mpsc::channel(1);
    let (sender, status_rx) = status_channel();
    daemon.set_status_sender(sender);
    daemon.start(&[]).await.unwrap();

    interrupt_tx.send(()).await.unwrap();
    daemon.control().push(Status::Stopped);

    let outcome = timeout(TICK, drive(&mut daemon, interrupt_rx, status_rx))
        .await
        .expect("run should terminate");

    assert!(outcome.is_ok());
    assert!(daemon.stop_count() <= 1);
}

#[tokio::test]
async fn test_closed_status_channel_is_invalid_state() {
    let mut daemon = MockDaemon::new("dropped-sender");
    let (_interrupt_tx, interrupt_rx) = mpsc::channel(1);
    let (sender, status_rx) = status_channel();
    daemon.set_status_sender(sender);
    daemon.start(&[]).await.unwrap();

    // All senders gone without a terminal notification: contract breach.
    daemon.control().drop_sender();

    let outcome = timeout(TICK, drive(&mut daemon, interrupt_rx, status_rx))
        .await
        .expect("run should end on the closed channel");

    assert!(matches!(outcome, Err(RunError::InvalidState)));
    assert_eq!(daemon.stop_count(), 1);
}

#[tokio::test]
async fn test_closed_interrupt_channel_disables_branch() {
    let mut daemon = MockDaemon::new("no-signals");
    let (interrupt_tx, interrupt_rx) = mpsc::channel(1);
    let (sender, status_rx) = status_channel();
    daemon.set_status_sender(sender);
    daemon.start(&[]).await.unwrap();

    // Forwarder failed to register: the loop continues on statuses alone.
    drop(interrupt_tx);
    let control = daemon.control();
    tokio::spawn(async move {
        control.push(Status::Stopped);
    });

    let outcome = timeout(TICK, drive(&mut daemon, interrupt_rx, status_rx))
        .await
        .expect("run should end on the stopped status");

    assert!(outcome.is_ok());
}

#[tokio::test]
async fn test_status_sender_last_write_wins() {
    let mut daemon = MockDaemon::new("two-senders");
    let (first_sender, mut first_rx) = status_channel();
    let (second_sender, mut second_rx) = status_channel();

    daemon.set_status_sender(first_sender);
    daemon.set_status_sender(second_sender);
    assert_eq!(daemon.sender_installs(), 2);

    daemon.control().push(Status::Running);

    assert_eq!(second_rx.recv().await, Some(Status::Running));
    assert!(first_rx.try_recv().is_err());
}
