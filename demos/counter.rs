// Examples are allowed to use expect/unwrap for simplicity
#![allow(clippy::expect_used, clippy::unwrap_used)]

//! Counter daemon example.
//!
//! A daemon that increments a counter every second, driven through the
//! sereno entry point: as a console program it stops on Ctrl-C, under a
//! service manager it stops on a manager request.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example counter
//!
//! # Stop after N ticks instead of waiting for Ctrl-C
//! cargo run --example counter -- --ticks 5
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicU8, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use sereno::prelude::*;

struct CounterDaemon {
    name: String,
    count: Arc<AtomicU64>,
    running: Arc<AtomicBool>,
    status: Arc<AtomicU8>,
    sender: Option<StatusSender>,
}

impl CounterDaemon {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            count: Arc::new(AtomicU64::new(0)),
            running: Arc::new(AtomicBool::new(false)),
            status: Arc::new(AtomicU8::new(encode(Status::Stopped))),
            sender: None,
        }
    }

    fn transition(&self, status: Status) {
        self.status.store(encode(status), Ordering::SeqCst);
        if let Some(sender) = &self.sender {
            sender.send(status);
        }
    }
}

fn encode(status: Status) -> u8 {
    match status {
        Status::Invalid => 0,
        Status::Stopped => 1,
        Status::Running => 2,
    }
}

fn decode(raw: u8) -> Status {
    match raw {
        1 => Status::Stopped,
        2 => Status::Running,
        _ => Status::Invalid,
    }
}

#[async_trait]
impl Daemon for CounterDaemon {
    fn name(&self) -> &str {
        &self.name
    }

    async fn start(&mut self, args: &[String]) -> Result<(), DaemonError> {
        if self.running.load(Ordering::SeqCst) {
            return Ok(());
        }

        let ticks = parse_ticks(args)?;

        self.running.store(true, Ordering::SeqCst);
        self.transition(Status::Running);

        let count = Arc::clone(&self.count);
        let running = Arc::clone(&self.running);
        let status = Arc::clone(&self.status);
        let sender = self.sender.clone();
        tokio::spawn(async move {
            while running.load(Ordering::SeqCst) {
                let n = count.fetch_add(1, Ordering::Relaxed) + 1;
                tracing::info!(count = n, "tick");
                if ticks.is_some_and(|limit| n >= limit) {
                    // Self-stop: the runner observes the Stopped push.
                    running.store(false, Ordering::SeqCst);
                    status.store(encode(Status::Stopped), Ordering::SeqCst);
                    if let Some(sender) = &sender {
                        sender.send(Status::Stopped);
                    }
                    return;
                }
                tokio::time::sleep(Duration::from_secs(1)).await;
            }
        });

        Ok(())
    }

    async fn stop(&mut self) {
        if !self.running.swap(false, Ordering::SeqCst) {
            return;
        }
        self.transition(Status::Stopped);
        tracing::info!(
            count = self.count.load(Ordering::Relaxed),
            "counter stopped"
        );
    }

    fn status(&self) -> Status {
        decode(self.status.load(Ordering::SeqCst))
    }

    fn set_status_sender(&mut self, sender: StatusSender) {
        self.sender = Some(sender);
    }
}

fn parse_ticks(args: &[String]) -> Result<Option<u64>, DaemonError> {
    let Some(pos) = args.iter().position(|a| a == "--ticks") else {
        return Ok(None);
    };
    let value = args
        .get(pos + 1)
        .ok_or_else(|| DaemonError::config("--ticks requires a value"))?;
    value
        .parse()
        .map(Some)
        .map_err(|_| DaemonError::config(format!("invalid tick count: {value}")))
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    // Route lifecycle outcomes into the tracing stack.
    set_logger(Arc::new(sereno::core::TracingLog));

    let mut daemon = CounterDaemon::new("counter");
    match sereno::host::run(&mut daemon).await {
        Ok(()) => {}
        Err(err) => {
            eprintln!("counter: {err}");
            std::process::exit(1);
        }
    }
}
