//! Fixed-interval scheduling of monitoring runs.

use std::future::Future;
use std::time::Duration;

use chrono::Utc;
use tokio::time::MissedTickBehavior;

use super::Monitor;

/// Runs a [`Monitor`] immediately and then on a fixed interval.
///
/// Runs never overlap: a tick that fires while a run is in progress is
/// skipped. A run error is logged by the monitor and the loop waits for the
/// next tick.
pub struct Scheduler<'m, 'a> {
    monitor: &'m Monitor<'a>,
    interval: Duration,
}

impl<'m, 'a> Scheduler<'m, 'a> {
    /// Schedules `monitor` every `interval`.
    #[must_use]
    pub const fn new(monitor: &'m Monitor<'a>, interval: Duration) -> Self {
        Self { monitor, interval }
    }

    /// Runs until `shutdown` resolves and returns the number of completed
    /// runs, successful or not.
    ///
    /// A run still in progress when `shutdown` resolves is abandoned before
    /// it persists tracking.
    pub async fn run_until<F>(&self, shutdown: F) -> u64
    where
        F: Future<Output = ()>,
    {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        tokio::pin!(shutdown);

        let repository = &self.monitor.settings().repository;
        tracing::info!(
            repository = %repository,
            interval_secs = self.interval.as_secs(),
            "scheduler started"
        );

        let mut completed: u64 = 0;
        loop {
            tokio::select! {
                biased;
                () = &mut shutdown => break,
                _ = ticker.tick() => {}
            }

            tokio::select! {
                biased;
                () = &mut shutdown => {
                    tracing::warn!(
                        repository = %repository,
                        "shutdown requested mid-run; tracking not persisted"
                    );
                    break;
                }
                _outcome = self.monitor.run_cycle(Utc::now()) => {
                    completed += 1;
                }
            }
        }

        tracing::info!(repository = %repository, runs = completed, "scheduler stopped");
        completed
    }
}
