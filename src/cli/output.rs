//! Output formatting utilities for CLI operations.

use std::io::Write;

use chrono::{DateTime, Utc};
use repowatch::notify::content::{issue_alert_subject, pull_request_update_subject};
use repowatch::source::{Label, RepositoryInfo};
use repowatch::{MonitorSettings, RunState};

use super::error::AppError;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M UTC";

/// Backend and storage choices shown in the report header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportContext {
    /// Data source backend name.
    pub source: String,
    /// Notification backend name.
    pub sink: String,
    /// Where tracking is kept.
    pub tracking: String,
    /// Repository metadata, or `None` when the lookup failed.
    pub repository: Option<RepositoryInfo>,
}

fn format_timestamp(instant: DateTime<Utc>) -> String {
    instant.format(TIMESTAMP_FORMAT).to_string()
}

fn label_names(labels: &[Label]) -> String {
    labels
        .iter()
        .map(|label| label.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn write_repository_status<W: Write>(
    writer: &mut W,
    repository: Option<&RepositoryInfo>,
) -> Result<(), AppError> {
    writeln!(writer, "Repository status")?;
    let Some(info) = repository else {
        writeln!(writer, "  unavailable (see log)")?;
        return Ok(());
    };
    writeln!(writer, "  Repository: {}", info.full_name)?;
    writeln!(
        writer,
        "  Description: {}",
        info.description.as_deref().unwrap_or("No description")
    )?;
    writeln!(writer, "  Open issues: {}", info.open_issues_count)?;
    writeln!(writer, "  Stars: {}", info.stargazers_count)?;
    writeln!(writer, "  Forks: {}", info.forks_count)?;
    writeln!(writer, "  URL: {}", info.html_url)?;
    Ok(())
}

/// Writes the dry-run status report to `writer`.
///
/// # Errors
///
/// Returns [`AppError::Io`] when writing fails.
pub fn write_dry_run_report<W: Write>(
    writer: &mut W,
    settings: &MonitorSettings,
    context: &ReportContext,
    state: &RunState,
) -> Result<(), AppError> {
    writeln!(writer, "Repowatch dry run for {}", state.repository)?;
    writeln!(writer, "Run at: {}", format_timestamp(state.run_at))?;
    writeln!(writer)?;
    write_repository_status(writer, context.repository.as_ref())?;
    writeln!(writer)?;
    writeln!(writer, "Configuration")?;
    writeln!(
        writer,
        "  Issue threshold: {} days",
        settings.issue_threshold_days
    )?;
    writeln!(
        writer,
        "  PR lookback: {} hours (since {})",
        settings.pr_lookback_hours,
        format_timestamp(state.window.starts_at())
    )?;
    writeln!(writer, "  Recipients: {}", settings.recipients)?;
    writeln!(writer, "  Source: {}", context.source)?;
    writeln!(writer, "  Sink: {}", context.sink)?;
    writeln!(writer, "  Tracking: {}", context.tracking)?;
    writeln!(
        writer,
        "  Re-alert on reopen: {}",
        if settings.realert_on_reopen { "yes" } else { "no" }
    )?;
    writeln!(writer)?;

    writeln!(
        writer,
        "Fetched {} open issues and {} recently resolved pull requests",
        state.issues.len(),
        state.pull_requests.len()
    )?;
    writeln!(writer)?;

    writeln!(writer, "Actionable issues ({})", state.actionable_issues.len())?;
    if state.actionable_issues.is_empty() {
        writeln!(writer, "  none")?;
    }
    for issue in &state.actionable_issues {
        writeln!(
            writer,
            "  #{} {} ({} days open)",
            issue.number,
            issue.title,
            issue.age_days(state.run_at)
        )?;
        if !issue.labels.is_empty() {
            writeln!(writer, "    Labels: {}", label_names(&issue.labels))?;
        }
    }
    writeln!(writer)?;

    writeln!(
        writer,
        "Actionable pull requests ({})",
        state.actionable_pull_requests.len()
    )?;
    if state.actionable_pull_requests.is_empty() {
        writeln!(writer, "  none")?;
    }
    for pr in &state.actionable_pull_requests {
        let resolved = pr
            .resolved_at()
            .map_or_else(|| "unknown".to_owned(), format_timestamp);
        writeln!(
            writer,
            "  #{} {} ({} at {resolved})",
            pr.number,
            pr.title,
            pr.resolution()
        )?;
    }
    writeln!(writer)?;

    writeln!(writer, "Would send")?;
    if state.actionable_issues.is_empty() && state.actionable_pull_requests.is_empty() {
        writeln!(writer, "  nothing")?;
    }
    if !state.actionable_issues.is_empty() {
        writeln!(
            writer,
            "  {}",
            issue_alert_subject(&state.repository, settings.issue_threshold_days)
        )?;
    }
    if !state.actionable_pull_requests.is_empty() {
        writeln!(writer, "  {}", pull_request_update_subject(&state.repository))?;
    }
    Ok(())
}
