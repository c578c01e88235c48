//! Per-run state.

use std::fmt;

use chrono::{DateTime, Utc};

use crate::source::{Issue, LookbackWindow, PullRequest, RepositorySlug};

/// Outcome of one conditional notification stage.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum NotificationOutcome {
    /// Nothing was actionable, or the stage did not run.
    #[default]
    NotSent,
    /// The sink accepted the notification.
    Sent,
    /// Rendering or delivery failed.
    Failed {
        /// Failure detail.
        message: String,
    },
}

impl NotificationOutcome {
    /// Stable name used in logs and telemetry.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NotSent => "not_sent",
            Self::Sent => "sent",
            Self::Failed { .. } => "failed",
        }
    }

    /// Returns true when the notification was delivered.
    #[must_use]
    pub const fn is_sent(&self) -> bool {
        matches!(self, Self::Sent)
    }
}

impl fmt::Display for NotificationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Failed { message } => write!(f, "failed: {message}"),
            other => f.write_str(other.as_str()),
        }
    }
}

/// Everything one run fetched, decided and did.
///
/// Created at the start of a run and handed back to the caller at the end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunState {
    /// Repository the run inspected.
    pub repository: RepositorySlug,
    /// Run timestamp; also the end of the lookback window.
    pub run_at: DateTime<Utc>,
    /// Pull request lookback window.
    pub window: LookbackWindow,
    /// Open issues returned by the data source.
    pub issues: Vec<Issue>,
    /// Pull requests returned by the data source.
    pub pull_requests: Vec<PullRequest>,
    /// Issues selected for the alert, oldest first.
    pub actionable_issues: Vec<Issue>,
    /// Pull requests selected for the update, most recent first.
    pub actionable_pull_requests: Vec<PullRequest>,
    /// Outcome of the issue alert.
    pub issue_alert: NotificationOutcome,
    /// Outcome of the pull request update.
    pub pull_request_update: NotificationOutcome,
}

impl RunState {
    /// Empty state for a run at `run_at`.
    #[must_use]
    pub const fn new(repository: RepositorySlug, run_at: DateTime<Utc>, window: LookbackWindow) -> Self {
        Self {
            repository,
            run_at,
            window,
            issues: Vec::new(),
            pull_requests: Vec::new(),
            actionable_issues: Vec::new(),
            actionable_pull_requests: Vec::new(),
            issue_alert: NotificationOutcome::NotSent,
            pull_request_update: NotificationOutcome::NotSent,
        }
    }
}
