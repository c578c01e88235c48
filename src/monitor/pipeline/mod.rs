//! The decision pipeline.
//!
//! One run executes, in order: fetch, classify issues, classify pull
//! requests, the conditional issue alert, the conditional pull request
//! update and the tracking update. A fetch or tracking failure aborts the
//! run; a notification failure is recorded and the run continues.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};

use crate::notify::content::{render_issue_alert, render_pull_request_update};
use crate::notify::{NotificationError, NotificationSink, RenderedNotification};
use crate::source::{LookbackWindow, RepositoryDataSource};
use crate::telemetry::{NoopTelemetrySink, TelemetryEvent, TelemetrySink};
use crate::tracking::{TrackingRecord, TrackingStore};

use super::classify::{actionable_issues, actionable_pull_requests};
use super::{MonitorError, MonitorSettings, NotificationOutcome, RunStage, RunState};

/// Runs the decision pipeline against borrowed backends.
pub struct Monitor<'a> {
    settings: MonitorSettings,
    source: &'a dyn RepositoryDataSource,
    sink: &'a dyn NotificationSink,
    store: &'a dyn TrackingStore,
    telemetry: &'a dyn TelemetrySink,
}

impl<'a> Monitor<'a> {
    /// Creates a monitor that records no telemetry.
    #[must_use]
    pub fn new(
        settings: MonitorSettings,
        source: &'a dyn RepositoryDataSource,
        sink: &'a dyn NotificationSink,
        store: &'a dyn TrackingStore,
    ) -> Self {
        Self {
            settings,
            source,
            sink,
            store,
            telemetry: &NoopTelemetrySink,
        }
    }

    /// Records cycle telemetry to `telemetry`.
    #[must_use]
    pub fn with_telemetry(mut self, telemetry: &'a dyn TelemetrySink) -> Self {
        self.telemetry = telemetry;
        self
    }

    /// Settings this monitor runs with.
    #[must_use]
    pub const fn settings(&self) -> &MonitorSettings {
        &self.settings
    }

    /// Runs every stage once with `now` as the run timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError`] when fetching fails (nothing is sent and
    /// tracking is untouched) or when the tracking record cannot be loaded
    /// or persisted.
    pub async fn run_cycle(&self, now: DateTime<Utc>) -> Result<RunState, MonitorError> {
        let mut state = self.new_state(now);
        let result = self.execute(&mut state).await;

        match &result {
            Ok(()) => {
                tracing::info!(
                    repository = %state.repository,
                    run_at = %now,
                    actionable_issues = state.actionable_issues.len(),
                    actionable_pull_requests = state.actionable_pull_requests.len(),
                    issue_alert = state.issue_alert.as_str(),
                    pull_request_update = state.pull_request_update.as_str(),
                    "monitoring cycle completed"
                );
                self.telemetry.record(TelemetryEvent::CycleCompleted {
                    repository: state.repository.to_string(),
                    run_at: now.to_rfc3339(),
                    issues_fetched: state.issues.len(),
                    pull_requests_fetched: state.pull_requests.len(),
                    actionable_issues: state.actionable_issues.len(),
                    actionable_pull_requests: state.actionable_pull_requests.len(),
                    issue_alert: state.issue_alert.as_str().to_owned(),
                    pull_request_update: state.pull_request_update.as_str().to_owned(),
                });
            }
            Err(error) => {
                tracing::error!(
                    repository = %state.repository,
                    run_at = %now,
                    stage = %error.stage(),
                    %error,
                    "monitoring cycle aborted"
                );
                self.telemetry.record(TelemetryEvent::CycleAborted {
                    repository: state.repository.to_string(),
                    run_at: now.to_rfc3339(),
                    stage: error.stage().to_string(),
                    error: error.to_string(),
                });
            }
        }

        result.map(|()| state)
    }

    /// Fetches and classifies without sending notifications or persisting
    /// tracking.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError`] when fetching or loading tracking fails.
    pub async fn preview(&self, now: DateTime<Utc>) -> Result<RunState, MonitorError> {
        let mut state = self.new_state(now);
        self.fetch(&mut state).await?;
        let record = self.load_tracking()?;
        self.classify(&mut state, &record);
        Ok(state)
    }

    fn new_state(&self, now: DateTime<Utc>) -> RunState {
        RunState::new(
            self.settings.repository.clone(),
            now,
            LookbackWindow::new(self.settings.pr_lookback_hours, now),
        )
    }

    async fn execute(&self, state: &mut RunState) -> Result<(), MonitorError> {
        self.fetch(state).await?;
        let mut record = self.load_tracking()?;
        self.classify(state, &record);

        state.issue_alert = if state.actionable_issues.is_empty() {
            NotificationOutcome::NotSent
        } else {
            let rendered = render_issue_alert(
                &state.repository,
                self.settings.issue_threshold_days,
                &state.actionable_issues,
                state.run_at,
            );
            self.deliver("issue_alert", rendered, state).await
        };

        state.pull_request_update = if state.actionable_pull_requests.is_empty() {
            NotificationOutcome::NotSent
        } else {
            let rendered = render_pull_request_update(
                &state.repository,
                &state.window,
                &state.actionable_pull_requests,
            );
            self.deliver("pull_request_update", rendered, state).await
        };

        update_tracking(&mut record, state);
        self.store
            .persist(&self.settings.repository, &record)
            .map_err(|source| MonitorError::Persistence {
                stage: RunStage::PersistTracking,
                source,
            })
    }

    async fn fetch(&self, state: &mut RunState) -> Result<(), MonitorError> {
        let repo = &self.settings.repository;
        let to_error = |source| MonitorError::DataSource {
            stage: RunStage::Fetch,
            source,
        };

        state.issues = self.source.list_open_issues(repo).await.map_err(to_error)?;
        state.pull_requests = self
            .source
            .list_recent_pull_requests(repo, &state.window)
            .await
            .map_err(to_error)?;

        tracing::debug!(
            repository = %repo,
            issues = state.issues.len(),
            pull_requests = state.pull_requests.len(),
            "fetched repository activity"
        );
        Ok(())
    }

    fn load_tracking(&self) -> Result<TrackingRecord, MonitorError> {
        self.store
            .load(&self.settings.repository)
            .map_err(|source| MonitorError::Persistence {
                stage: RunStage::LoadTracking,
                source,
            })
    }

    fn classify(&self, state: &mut RunState, record: &TrackingRecord) {
        state.actionable_issues = actionable_issues(
            &state.issues,
            state.run_at,
            self.settings.issue_threshold_days,
            record,
            self.settings.realert_on_reopen,
        );
        state.actionable_pull_requests =
            actionable_pull_requests(&state.pull_requests, &state.window, record);
    }

    async fn deliver(
        &self,
        stage: &'static str,
        rendered: Result<RenderedNotification, NotificationError>,
        state: &RunState,
    ) -> NotificationOutcome {
        let result = match rendered {
            Ok(notification) => {
                self.sink
                    .send(
                        &self.settings.recipients,
                        &notification.subject,
                        &notification.content,
                    )
                    .await
            }
            Err(error) => Err(error),
        };

        match result {
            Ok(()) => NotificationOutcome::Sent,
            Err(error) => {
                tracing::error!(
                    repository = %state.repository,
                    run_at = %state.run_at,
                    stage,
                    %error,
                    "notification failed"
                );
                NotificationOutcome::Failed {
                    message: error.to_string(),
                }
            }
        }
    }
}

/// Applies a finished run to `record`.
///
/// Items of delivered notifications are recorded with the run timestamp,
/// tracked issues missing from the fetched open set are flagged as closed,
/// and pull request entries older than the window are dropped. Applying the
/// same state twice yields the same record.
pub fn update_tracking(record: &mut TrackingRecord, state: &RunState) {
    if state.issue_alert.is_sent() {
        for issue in &state.actionable_issues {
            record.record_issue(issue, state.run_at);
        }
    }
    if state.pull_request_update.is_sent() {
        for pr in &state.actionable_pull_requests {
            record.record_pull_request(pr, state.run_at);
        }
    }

    let open_issue_numbers: BTreeSet<u64> = state
        .issues
        .iter()
        .filter(|issue| issue.is_open())
        .map(|issue| issue.number)
        .collect();
    record.mark_closed_issues(&open_issue_numbers);
    record.prune_pull_requests_before(state.window.starts_at());
}
