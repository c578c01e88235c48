//! Dry-run mode: fetch and classify, then print what would be sent.

use std::io::{self, Write};

use chrono::Utc;
use repowatch::notify::NoopNotificationSink;
use repowatch::{Monitor, RepositoryDataSource, RepowatchConfig};

use super::backends::{data_source, tracking_description, tracking_store};
use super::error::AppError;
use super::output::{ReportContext, write_dry_run_report};

/// Fetches, classifies, and prints the status report to stdout.
///
/// Nothing is sent and tracking is not updated. A failed repository status
/// lookup is logged and reported as unavailable.
///
/// # Errors
///
/// Returns [`AppError`] when configuration is incomplete, fetching or
/// loading tracking fails, or the report cannot be written.
pub async fn run(config: &RepowatchConfig) -> Result<(), AppError> {
    let settings = config.monitor_settings()?;
    let source = data_source(config)?;
    let store = tracking_store(config)?;
    let sink = NoopNotificationSink;

    let monitor = Monitor::new(settings, &*source, &sink, &*store);
    let state = monitor.preview(Utc::now()).await?;

    let repository = match source.repository_info(&state.repository).await {
        Ok(info) => Some(info),
        Err(error) => {
            tracing::warn!(repository = %state.repository, %error, "repository status lookup failed");
            None
        }
    };
    let context = ReportContext {
        source: config.source_backend()?.to_string(),
        sink: config.sink_backend()?.to_string(),
        tracking: tracking_description(config),
        repository,
    };

    let mut stdout = io::stdout().lock();
    write_dry_run_report(&mut stdout, monitor.settings(), &context, &state)?;
    stdout.flush()?;
    Ok(())
}
