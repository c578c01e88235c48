//! Scheduler mode: run immediately, then on a fixed interval until Ctrl-C.

use repowatch::telemetry::TracingTelemetrySink;
use repowatch::{Monitor, RepowatchConfig, Scheduler};
use tokio::signal;

use super::backends::{data_source, notification_sink, tracking_store};
use super::error::AppError;

/// Resolves when the process receives Ctrl-C.
async fn interrupted() {
    if let Err(error) = signal::ctrl_c().await {
        tracing::error!(%error, "failed to listen for Ctrl-C; stopping scheduler");
    }
}

/// Runs the scheduler loop until interrupted.
///
/// Individual run failures are logged and never stop the loop.
///
/// # Errors
///
/// Returns [`AppError`] when the configuration is incomplete or a backend
/// cannot be constructed.
pub async fn run(config: &RepowatchConfig) -> Result<(), AppError> {
    let settings = config.monitor_settings()?;
    let interval = config.check_interval()?;
    let source = data_source(config)?;
    let sink = notification_sink(config)?;
    let store = tracking_store(config)?;

    let monitor =
        Monitor::new(settings, &*source, &*sink, &*store).with_telemetry(&TracingTelemetrySink);
    let runs = Scheduler::new(&monitor, interval)
        .run_until(interrupted())
        .await;

    tracing::info!(runs, "scheduler stopped");
    Ok(())
}
