//! In-memory tracking record.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};

use crate::source::{Issue, PullRequest};

/// Kind of tracked item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ItemKind {
    /// An issue.
    Issue,
    /// A pull request.
    PullRequest,
}

impl ItemKind {
    /// Stable storage name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Issue => "issue",
            Self::PullRequest => "pull_request",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a stored kind name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown tracked item kind `{0}`")]
pub struct UnknownItemKind(pub String);

impl FromStr for ItemKind {
    type Err = UnknownItemKind;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "issue" => Ok(Self::Issue),
            "pull_request" => Ok(Self::PullRequest),
            other => Err(UnknownItemKind(other.to_owned())),
        }
    }
}

/// Identity of a tracked item within one repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TrackingKey {
    /// Item kind.
    pub kind: ItemKind,
    /// Issue or pull request number.
    pub number: u64,
}

impl TrackingKey {
    /// Key for an issue.
    #[must_use]
    pub const fn issue(number: u64) -> Self {
        Self {
            kind: ItemKind::Issue,
            number,
        }
    }

    /// Key for a pull request.
    #[must_use]
    pub const fn pull_request(number: u64) -> Self {
        Self {
            kind: ItemKind::PullRequest,
            number,
        }
    }
}

/// What was notified about an item, and when.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackedEntry {
    /// State the notification was about: an issue's creation time or a pull
    /// request's resolution time.
    pub state_marker: DateTime<Utc>,
    /// Run timestamp of the notification.
    pub notified_at: DateTime<Utc>,
    /// Set when an alerted issue later left the open set.
    pub closed_since_notified: bool,
}

/// Cross-run memory of which items already triggered a notification.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackingRecord {
    entries: BTreeMap<TrackingKey, TrackedEntry>,
}

impl TrackingRecord {
    /// Empty record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up an entry.
    #[must_use]
    pub fn get(&self, key: TrackingKey) -> Option<&TrackedEntry> {
        self.entries.get(&key)
    }

    /// Inserts or replaces an entry.
    pub fn insert(&mut self, key: TrackingKey, entry: TrackedEntry) {
        self.entries.insert(key, entry);
    }

    /// Iterates entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&TrackingKey, &TrackedEntry)> {
        self.entries.iter()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when nothing is tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns true when `issue` was already alerted in its current state.
    ///
    /// A tracked issue that closed and reappeared stays suppressed unless
    /// `realert_on_reopen` is set.
    #[must_use]
    pub fn suppresses_issue(&self, issue: &Issue, realert_on_reopen: bool) -> bool {
        match self.get(TrackingKey::issue(issue.number)) {
            Some(entry) if entry.state_marker == issue.created_at => {
                !(entry.closed_since_notified && realert_on_reopen)
            }
            _ => false,
        }
    }

    /// Returns true when `pr` was already notified for its current resolution.
    #[must_use]
    pub fn suppresses_pull_request(&self, pr: &PullRequest) -> bool {
        match (
            self.get(TrackingKey::pull_request(pr.number)),
            pr.resolved_at(),
        ) {
            (Some(entry), Some(resolved_at)) => entry.state_marker == resolved_at,
            _ => false,
        }
    }

    /// Records that `issue` was alerted at `notified_at`.
    pub fn record_issue(&mut self, issue: &Issue, notified_at: DateTime<Utc>) {
        self.insert(
            TrackingKey::issue(issue.number),
            TrackedEntry {
                state_marker: issue.created_at,
                notified_at,
                closed_since_notified: false,
            },
        );
    }

    /// Records that `pr` was notified at `notified_at`. Pull requests without
    /// a resolution timestamp are ignored.
    pub fn record_pull_request(&mut self, pr: &PullRequest, notified_at: DateTime<Utc>) {
        let Some(state_marker) = pr.resolved_at() else {
            return;
        };
        self.insert(
            TrackingKey::pull_request(pr.number),
            TrackedEntry {
                state_marker,
                notified_at,
                closed_since_notified: false,
            },
        );
    }

    /// Flags tracked issues that are absent from `open_issue_numbers`.
    pub fn mark_closed_issues(&mut self, open_issue_numbers: &BTreeSet<u64>) {
        for (key, entry) in &mut self.entries {
            if key.kind == ItemKind::Issue && !open_issue_numbers.contains(&key.number) {
                entry.closed_since_notified = true;
            }
        }
    }

    /// Drops pull request entries resolved before `cutoff`. Such entries can
    /// no longer match a pull request inside the lookback window.
    pub fn prune_pull_requests_before(&mut self, cutoff: DateTime<Utc>) {
        self.entries.retain(|key, entry| {
            key.kind != ItemKind::PullRequest || entry.state_marker >= cutoff
        });
    }
}
