//! Domain models for the issues and pull requests a monitoring run inspects.
//!
//! These types are backend-neutral: both the direct GitHub backend and the
//! MCP backend convert their wire payloads into them, so the decision
//! pipeline never sees transport details.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

/// Open/closed state of an issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueState {
    /// The issue is open.
    Open,
    /// The issue is closed.
    Closed,
}

impl IssueState {
    /// Parses the GitHub `state` string. Anything other than `closed` counts
    /// as open.
    #[must_use]
    pub fn from_api(value: &str) -> Self {
        if value.eq_ignore_ascii_case("closed") {
            Self::Closed
        } else {
            Self::Open
        }
    }
}

/// Issue or pull request label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Label {
    /// Label name.
    pub name: String,
    /// Hex colour without the leading `#`, when GitHub supplied one.
    pub color: Option<String>,
}

/// A GitHub issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    /// Issue number.
    pub number: u64,
    /// Issue title.
    pub title: String,
    /// Current state.
    pub state: IssueState,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp, when known.
    pub updated_at: Option<DateTime<Utc>>,
    /// Attached labels.
    pub labels: Vec<Label>,
    /// Assignee logins.
    pub assignees: Vec<String>,
    /// Link to the issue on GitHub.
    pub html_url: String,
}

impl Issue {
    /// Returns the whole number of days the issue has been open at `now`.
    ///
    /// Issues created after `now` (clock skew) report an age of zero.
    #[must_use]
    pub fn age_days(&self, now: DateTime<Utc>) -> i64 {
        now.signed_duration_since(self.created_at).num_days().max(0)
    }

    /// Returns true when the issue is open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.state == IssueState::Open
    }
}

/// How a pull request left the open state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Resolution {
    /// Merged into the base branch.
    Merged,
    /// Closed without merging.
    Closed,
    /// Still open.
    Open,
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Merged => "Merged",
            Self::Closed => "Closed",
            Self::Open => "Open",
        };
        f.write_str(label)
    }
}

/// A GitHub pull request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequest {
    /// Pull request number.
    pub number: u64,
    /// Pull request title.
    pub title: String,
    /// Merge timestamp when merged.
    pub merged_at: Option<DateTime<Utc>>,
    /// Close timestamp when closed (GitHub also sets this on merge).
    pub closed_at: Option<DateTime<Utc>>,
    /// Attached labels.
    pub labels: Vec<Label>,
    /// Assignee logins.
    pub assignees: Vec<String>,
    /// Link to the pull request on GitHub.
    pub html_url: String,
}

impl PullRequest {
    /// Returns true when the pull request was merged.
    #[must_use]
    pub const fn is_merged(&self) -> bool {
        self.merged_at.is_some()
    }

    /// Returns whether the pull request was merged, closed, or is open.
    #[must_use]
    pub const fn resolution(&self) -> Resolution {
        if self.merged_at.is_some() {
            Resolution::Merged
        } else if self.closed_at.is_some() {
            Resolution::Closed
        } else {
            Resolution::Open
        }
    }

    /// Timestamp at which the pull request was merged, or closed when it was
    /// not merged.
    #[must_use]
    pub fn resolved_at(&self) -> Option<DateTime<Utc>> {
        self.merged_at.or(self.closed_at)
    }
}

/// Headline facts about the monitored repository, shown in status reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepositoryInfo {
    /// `owner/name` as GitHub reports it.
    pub full_name: String,
    /// Free-text description, when the repository has one.
    pub description: Option<String>,
    /// Link to the repository on GitHub.
    pub html_url: String,
    /// Open issues plus open pull requests, as GitHub counts them.
    pub open_issues_count: u64,
    /// Stargazer count.
    pub stargazers_count: u64,
    /// Fork count.
    pub forks_count: u64,
}

/// Trailing interval, ending at the run timestamp, in which pull request
/// activity counts as recent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LookbackWindow {
    hours: u32,
    ending_at: DateTime<Utc>,
}

impl LookbackWindow {
    /// Creates a window of `hours` ending at `ending_at`.
    #[must_use]
    pub const fn new(hours: u32, ending_at: DateTime<Utc>) -> Self {
        Self { hours, ending_at }
    }

    /// Window length in hours.
    #[must_use]
    pub const fn hours(&self) -> u32 {
        self.hours
    }

    /// Instant the window ends at.
    #[must_use]
    pub const fn ending_at(&self) -> DateTime<Utc> {
        self.ending_at
    }

    /// Instant the window starts at (inclusive).
    #[must_use]
    pub fn starts_at(&self) -> DateTime<Utc> {
        self.ending_at - Duration::hours(i64::from(self.hours))
    }

    /// Returns true when `instant` lies at or after the window start.
    ///
    /// Instants after `ending_at` still count: a close that GitHub stamped a
    /// moment ahead of the local clock is recent activity.
    #[must_use]
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.starts_at()
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use rstest::rstest;

    use super::{IssueState, LookbackWindow, Resolution};
    use crate::source::test_support::{fixed_now, issue_created_at, pull_request_resolved};

    #[rstest]
    #[case::exact_days(Duration::days(7), 7)]
    #[case::partial_day_rounds_down(Duration::days(7) - Duration::seconds(1), 6)]
    #[case::created_in_future(-Duration::hours(3), 0)]
    fn issue_age_counts_whole_days(#[case] open_for: Duration, #[case] expected: i64) {
        let now = fixed_now();
        let issue = issue_created_at(1, now - open_for);

        assert_eq!(issue.age_days(now), expected);
    }

    #[rstest]
    #[case::merged(true, true, Resolution::Merged)]
    #[case::closed(false, true, Resolution::Closed)]
    #[case::open(false, false, Resolution::Open)]
    fn pull_request_resolution_prefers_merge(
        #[case] merged: bool,
        #[case] closed: bool,
        #[case] expected: Resolution,
    ) {
        let at = fixed_now();
        let mut pr = pull_request_resolved(5, at, merged);
        if !closed {
            pr.closed_at = None;
        }

        assert_eq!(pr.resolution(), expected);
        assert_eq!(pr.is_merged(), merged);
    }

    #[test]
    fn lookback_window_includes_start_boundary() {
        let end = fixed_now();
        let window = LookbackWindow::new(24, end);

        assert!(window.contains(end - Duration::hours(24)));
        assert!(!window.contains(end - Duration::hours(24) - Duration::seconds(1)));
        assert!(window.contains(end));
    }

    #[rstest]
    #[case("open", IssueState::Open)]
    #[case("closed", IssueState::Closed)]
    #[case("CLOSED", IssueState::Closed)]
    fn issue_state_parses_api_values(#[case] raw: &str, #[case] expected: IssueState) {
        assert_eq!(IssueState::from_api(raw), expected);
    }
}
