//! Settings a monitoring run needs.

use crate::notify::Recipients;
use crate::source::RepositorySlug;

/// Default minimum age, in days, for an issue to be alerted.
pub const DEFAULT_ISSUE_THRESHOLD_DAYS: u32 = 7;

/// Default pull request lookback window, in hours.
pub const DEFAULT_PR_LOOKBACK_HOURS: u32 = 24;

/// Default scheduler interval, in hours.
pub const DEFAULT_CHECK_INTERVAL_HOURS: u32 = 24;

/// Validated per-run settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorSettings {
    /// Repository being monitored.
    pub repository: RepositorySlug,
    /// Notification recipients.
    pub recipients: Recipients,
    /// Issues open this many whole days or longer are actionable.
    pub issue_threshold_days: u32,
    /// Pull requests resolved within this many hours are actionable.
    pub pr_lookback_hours: u32,
    /// Re-alert issues that closed and reopened since their alert.
    pub realert_on_reopen: bool,
}

impl MonitorSettings {
    /// Settings with default thresholds.
    #[must_use]
    pub const fn new(repository: RepositorySlug, recipients: Recipients) -> Self {
        Self {
            repository,
            recipients,
            issue_threshold_days: DEFAULT_ISSUE_THRESHOLD_DAYS,
            pr_lookback_hours: DEFAULT_PR_LOOKBACK_HOURS,
            realert_on_reopen: false,
        }
    }
}
