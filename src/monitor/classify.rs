//! Selection and ordering of actionable items.
//!
//! Output order depends only on item content, never on the order the data
//! source returned items in.

use std::cmp::Reverse;

use chrono::{DateTime, Utc};

use crate::source::{Issue, LookbackWindow, PullRequest};
use crate::tracking::TrackingRecord;

/// Open issues at least `threshold_days` old that `record` does not
/// suppress, sorted by age descending, then creation time, then number.
#[must_use]
pub fn actionable_issues(
    issues: &[Issue],
    now: DateTime<Utc>,
    threshold_days: u32,
    record: &TrackingRecord,
    realert_on_reopen: bool,
) -> Vec<Issue> {
    let threshold = i64::from(threshold_days);
    let mut selected: Vec<Issue> = issues
        .iter()
        .filter(|issue| issue.is_open())
        .filter(|issue| issue.age_days(now) >= threshold)
        .filter(|issue| !record.suppresses_issue(issue, realert_on_reopen))
        .cloned()
        .collect();

    selected.sort_by_key(|issue| (Reverse(issue.age_days(now)), issue.created_at, issue.number));
    selected.dedup_by_key(|issue| issue.number);
    selected
}

/// Pull requests resolved inside `window` that `record` does not suppress,
/// sorted by resolution time descending, then number.
#[must_use]
pub fn actionable_pull_requests(
    pull_requests: &[PullRequest],
    window: &LookbackWindow,
    record: &TrackingRecord,
) -> Vec<PullRequest> {
    let mut selected: Vec<PullRequest> = pull_requests
        .iter()
        .filter(|pr| pr.resolved_at().is_some_and(|at| window.contains(at)))
        .filter(|pr| !record.suppresses_pull_request(pr))
        .cloned()
        .collect();

    selected.sort_by_key(|pr| (Reverse(pr.resolved_at()), pr.number));
    selected.dedup_by_key(|pr| pr.number);
    selected
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use rstest::rstest;

    use super::*;
    use crate::source::IssueState;
    use crate::source::test_support::{fixed_now, issue_open_for_days, pull_request_resolved};

    fn numbers_of_issues(issues: &[Issue]) -> Vec<u64> {
        issues.iter().map(|issue| issue.number).collect()
    }

    fn numbers_of_prs(prs: &[PullRequest]) -> Vec<u64> {
        prs.iter().map(|pr| pr.number).collect()
    }

    #[rstest]
    #[case::exactly_at_threshold(7, true)]
    #[case::one_day_below(6, false)]
    #[case::well_beyond(30, true)]
    fn issue_threshold_is_inclusive(#[case] age_days: i64, #[case] actionable: bool) {
        let now = fixed_now();
        let issues = vec![issue_open_for_days(1, age_days, now)];

        let selected = actionable_issues(&issues, now, 7, &TrackingRecord::new(), false);

        assert_eq!(!selected.is_empty(), actionable);
    }

    #[test]
    fn zero_threshold_selects_brand_new_issues() {
        let now = fixed_now();
        let issues = vec![issue_open_for_days(1, 0, now)];

        let selected = actionable_issues(&issues, now, 0, &TrackingRecord::new(), false);

        assert_eq!(numbers_of_issues(&selected), vec![1]);
    }

    #[test]
    fn closed_issues_are_never_actionable() {
        let now = fixed_now();
        let mut issue = issue_open_for_days(1, 40, now);
        issue.state = IssueState::Closed;

        let selected = actionable_issues(&[issue], now, 7, &TrackingRecord::new(), false);

        assert!(selected.is_empty());
    }

    #[test]
    fn tracked_issue_is_not_selected_again() {
        let now = fixed_now();
        let issues = vec![issue_open_for_days(1, 10, now), issue_open_for_days(2, 10, now)];
        let mut record = TrackingRecord::new();
        let first = issues.first().expect("issue should exist");
        record.record_issue(first, now - Duration::days(1));

        let selected = actionable_issues(&issues, now, 7, &record, false);

        assert_eq!(numbers_of_issues(&selected), vec![2]);
    }

    #[rstest]
    #[case::ascending(vec![1, 2, 3, 4])]
    #[case::descending(vec![4, 3, 2, 1])]
    #[case::shuffled(vec![3, 1, 4, 2])]
    fn issue_order_ignores_input_order(#[case] input_order: Vec<u64>) {
        let now = fixed_now();
        let build = |number: u64| match number {
            1 => issue_open_for_days(1, 8, now),
            2 => issue_open_for_days(2, 20, now),
            // Same age as #2 but created an hour earlier.
            3 => {
                let mut issue = issue_open_for_days(3, 20, now);
                issue.created_at -= Duration::hours(1);
                issue
            }
            _ => issue_open_for_days(number, 20, now),
        };
        let issues: Vec<Issue> = input_order.into_iter().map(build).collect();

        let selected = actionable_issues(&issues, now, 7, &TrackingRecord::new(), false);

        assert_eq!(numbers_of_issues(&selected), vec![3, 2, 4, 1]);
    }

    #[test]
    fn duplicate_issues_collapse() {
        let now = fixed_now();
        let issue = issue_open_for_days(5, 9, now);

        let selected = actionable_issues(
            &[issue.clone(), issue],
            now,
            7,
            &TrackingRecord::new(),
            false,
        );

        assert_eq!(numbers_of_issues(&selected), vec![5]);
    }

    #[rstest]
    #[case::at_window_edge(Duration::hours(24), true)]
    #[case::just_outside(Duration::hours(24) + Duration::seconds(1), false)]
    #[case::two_hours_ago(Duration::hours(2), true)]
    fn pull_request_window_is_inclusive(#[case] ago: Duration, #[case] actionable: bool) {
        let now = fixed_now();
        let window = LookbackWindow::new(24, now);
        let prs = vec![pull_request_resolved(9, now - ago, true)];

        let selected = actionable_pull_requests(&prs, &window, &TrackingRecord::new());

        assert_eq!(!selected.is_empty(), actionable);
    }

    #[test]
    fn open_pull_requests_are_never_actionable() {
        let now = fixed_now();
        let mut pr = pull_request_resolved(9, now, false);
        pr.closed_at = None;

        let selected =
            actionable_pull_requests(&[pr], &LookbackWindow::new(24, now), &TrackingRecord::new());

        assert!(selected.is_empty());
    }

    #[rstest]
    #[case::ascending(vec![1, 2, 3])]
    #[case::descending(vec![3, 2, 1])]
    #[case::shuffled(vec![2, 3, 1])]
    fn pull_request_order_ignores_input_order(#[case] input_order: Vec<u64>) {
        let now = fixed_now();
        let build = |number: u64| match number {
            1 => pull_request_resolved(1, now - Duration::hours(5), true),
            2 => pull_request_resolved(2, now - Duration::hours(1), false),
            _ => pull_request_resolved(number, now - Duration::hours(1), true),
        };
        let prs: Vec<PullRequest> = input_order.into_iter().map(build).collect();

        let selected =
            actionable_pull_requests(&prs, &LookbackWindow::new(24, now), &TrackingRecord::new());

        assert_eq!(numbers_of_prs(&selected), vec![2, 3, 1]);
    }

    #[test]
    fn tracked_pull_request_is_not_selected_again() {
        let now = fixed_now();
        let pr = pull_request_resolved(7, now - Duration::hours(3), true);
        let mut record = TrackingRecord::new();
        record.record_pull_request(&pr, now - Duration::hours(2));

        let selected = actionable_pull_requests(&[pr], &LookbackWindow::new(24, now), &record);

        assert!(selected.is_empty());
    }
}
