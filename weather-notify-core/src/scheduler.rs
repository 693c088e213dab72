//! Fixed-interval driver for [`NotificationRunner::run_cycle`].
//!
//! The first cycle runs as soon as the scheduler starts. Cycles run one after
//! another on a single task and never overlap; a stop request is honoured at
//! the next wake, after any in-flight cycle has finished.

use std::{sync::Arc, time::Duration};

use tokio::{
    sync::watch,
    task::JoinHandle,
    time::{self, MissedTickBehavior},
};

use crate::runner::NotificationRunner;

/// Shortest accepted interval.
pub const MIN_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug)]
pub struct Scheduler {
    runner: Arc<NotificationRunner>,
}

impl Scheduler {
    pub fn new(runner: Arc<NotificationRunner>) -> Self {
        Self { runner }
    }

    /// Spawn the loop on the current runtime.
    pub fn start(self, interval: Duration) -> SchedulerHandle {
        let interval = interval.max(MIN_INTERVAL);
        let (stop_tx, stop_rx) = watch::channel(false);

        tracing::info!(interval_secs = interval.as_secs(), "scheduler started");
        let task = tokio::spawn(run_loop(self.runner, interval, stop_rx));

        SchedulerHandle { stop_tx, task }
    }
}

async fn run_loop(
    runner: Arc<NotificationRunner>,
    interval: Duration,
    mut stop_rx: watch::Receiver<bool>,
) -> u64 {
    let mut ticker = time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut cycles = 0;
    loop {
        tokio::select! {
            biased;

            changed = stop_rx.changed() => {
                // a dropped handle also stops the loop
                if changed.is_err() || *stop_rx.borrow() {
                    break;
                }
            }
            _ = ticker.tick() => {
                runner.run_cycle().await;
                cycles += 1;
            }
        }
    }

    tracing::info!(cycles, "scheduler stopped");
    cycles
}

#[derive(Debug)]
pub struct SchedulerHandle {
    stop_tx: watch::Sender<bool>,
    task: JoinHandle<u64>,
}

impl SchedulerHandle {
    /// Ask the loop to exit at its next wake.
    pub fn stop(&self) {
        // the loop may already be gone
        let _ = self.stop_tx.send(true);
    }

    /// Wait for the loop to exit and return how many cycles it completed.
    pub async fn join(self) -> Result<u64, tokio::task::JoinError> {
        self.task.await
    }
}
