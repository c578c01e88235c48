//! Builders and fakes for exercising the monitor without GitHub.
//!
//! # Examples
//!
//! ```
//! use repowatch::source::test_support::{fixed_now, issue_open_for_days};
//!
//! let issue = issue_open_for_days(7, 10, fixed_now());
//! assert_eq!(issue.age_days(fixed_now()), 10);
//! ```

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};

use super::{
    DataSourceError, Issue, IssueState, LookbackWindow, PullRequest, RepositoryDataSource,
    RepositoryInfo, RepositorySlug,
};

/// A fixed instant used as "now" across tests: 2025-03-10 12:00:00 UTC.
#[must_use]
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0)
        .single()
        .unwrap_or_default()
}

/// Builds an open issue created at `created_at`.
#[must_use]
pub fn issue_created_at(number: u64, created_at: DateTime<Utc>) -> Issue {
    Issue {
        number,
        title: format!("Issue {number}"),
        state: IssueState::Open,
        created_at,
        updated_at: Some(created_at),
        labels: Vec::new(),
        assignees: Vec::new(),
        html_url: format!("https://github.com/octo/repo/issues/{number}"),
    }
}

/// Builds an open issue that is `days` whole days old at `now`.
#[must_use]
pub fn issue_open_for_days(number: u64, days: i64, now: DateTime<Utc>) -> Issue {
    issue_created_at(number, now - Duration::days(days))
}

/// Builds a pull request resolved at `at`, merged or merely closed.
#[must_use]
pub fn pull_request_resolved(number: u64, at: DateTime<Utc>, merged: bool) -> PullRequest {
    PullRequest {
        number,
        title: format!("Pull request {number}"),
        merged_at: merged.then_some(at),
        closed_at: Some(at),
        labels: Vec::new(),
        assignees: Vec::new(),
        html_url: format!("https://github.com/octo/repo/pull/{number}"),
    }
}

/// Data source serving canned issues and pull requests, or a canned error.
///
/// Counts calls so tests can assert the scheduler kept polling.
#[derive(Debug, Default)]
pub struct StaticDataSource {
    issues: Vec<Issue>,
    pull_requests: Vec<PullRequest>,
    failure: Option<DataSourceError>,
    calls: Mutex<u32>,
}

impl StaticDataSource {
    /// Serves the given issues and pull requests.
    #[must_use]
    pub const fn new(issues: Vec<Issue>, pull_requests: Vec<PullRequest>) -> Self {
        Self {
            issues,
            pull_requests,
            failure: None,
            calls: Mutex::new(0),
        }
    }

    /// Fails every call with `error`.
    #[must_use]
    pub const fn failing(error: DataSourceError) -> Self {
        Self {
            issues: Vec::new(),
            pull_requests: Vec::new(),
            failure: Some(error),
            calls: Mutex::new(0),
        }
    }

    /// Number of `list_open_issues` calls served so far.
    #[must_use]
    pub fn issue_calls(&self) -> u32 {
        self.calls.lock().map_or(0, |calls| *calls)
    }
}

#[async_trait]
impl RepositoryDataSource for StaticDataSource {
    async fn list_open_issues(
        &self,
        _repo: &RepositorySlug,
    ) -> Result<Vec<Issue>, DataSourceError> {
        if let Ok(mut calls) = self.calls.lock() {
            *calls += 1;
        }
        match &self.failure {
            Some(error) => Err(error.clone()),
            None => Ok(self.issues.clone()),
        }
    }

    async fn list_recent_pull_requests(
        &self,
        _repo: &RepositorySlug,
        _window: &LookbackWindow,
    ) -> Result<Vec<PullRequest>, DataSourceError> {
        match &self.failure {
            Some(error) => Err(error.clone()),
            None => Ok(self.pull_requests.clone()),
        }
    }

    /// Describes `repo` with the canned issues as its only open items.
    async fn repository_info(
        &self,
        repo: &RepositorySlug,
    ) -> Result<RepositoryInfo, DataSourceError> {
        match &self.failure {
            Some(error) => Err(error.clone()),
            None => Ok(RepositoryInfo {
                full_name: repo.to_string(),
                description: None,
                html_url: repo.html_url(),
                open_issues_count: u64::try_from(self.issues.len()).unwrap_or(u64::MAX),
                stargazers_count: 0,
                forks_count: 0,
            }),
        }
    }
}
