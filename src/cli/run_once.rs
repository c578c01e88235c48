//! Single-pass mode.

use chrono::Utc;
use repowatch::telemetry::TracingTelemetrySink;
use repowatch::{Monitor, RepowatchConfig};

use super::backends::{data_source, notification_sink, tracking_store};
use super::error::AppError;

/// Runs every pipeline stage once.
///
/// A failed notification is logged and does not fail the pass; the item
/// stays untracked so the next pass retries it.
///
/// # Errors
///
/// Returns [`AppError::Monitor`] when fetching fails or tracking cannot be
/// loaded or persisted, and [`AppError`] construction errors for
/// incomplete backend settings.
pub async fn run(config: &RepowatchConfig) -> Result<(), AppError> {
    config.require_database_url()?;
    let settings = config.monitor_settings()?;
    let source = data_source(config)?;
    let sink = notification_sink(config)?;
    let store = tracking_store(config)?;

    let monitor =
        Monitor::new(settings, &*source, &*sink, &*store).with_telemetry(&TracingTelemetrySink);
    monitor.run_cycle(Utc::now()).await?;
    Ok(())
}
