//! Rendering of the issue alert and pull request update.
//!
//! Each notification is rendered twice from embedded minijinja templates:
//! an HTML body (auto-escaped because the template name ends in `.html`)
//! and a plain-text body for clients that do not render HTML.
//!
//! # Template variables
//!
//! Both templates receive `repository`, `repository_url` and
//! `generated_at`. The issue alert adds `threshold_days` and `issues`
//! (`number`, `title`, `age_days`, `created_on`, `labels`, `assignees`,
//! `url`); the pull request update adds `lookback_hours` and
//! `pull_requests` (`number`, `title`, `status`, `resolved_at`, `labels`,
//! `assignees`, `url`).

use chrono::{DateTime, Utc};
use minijinja::{Environment, context};
use serde::Serialize;

use crate::source::{Issue, Label, LookbackWindow, PullRequest, RepositorySlug};

use super::{FormattedContent, NotificationError};

const ISSUE_ALERT_HTML: &str = "issue_alert.html";
const ISSUE_ALERT_TEXT: &str = "issue_alert.txt";
const PULL_REQUEST_UPDATE_HTML: &str = "pull_request_update.html";
const PULL_REQUEST_UPDATE_TEXT: &str = "pull_request_update.txt";

/// Subject and bodies of a notification ready to hand to a sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedNotification {
    /// Email subject line.
    pub subject: String,
    /// HTML and plain-text bodies.
    pub content: FormattedContent,
}

#[derive(Debug, Serialize)]
struct IssueView<'a> {
    number: u64,
    title: &'a str,
    age_days: i64,
    created_on: String,
    labels: Vec<&'a str>,
    assignees: &'a [String],
    url: &'a str,
}

#[derive(Debug, Serialize)]
struct PullRequestView<'a> {
    number: u64,
    title: &'a str,
    status: String,
    resolved_at: String,
    labels: Vec<&'a str>,
    assignees: &'a [String],
    url: &'a str,
}

/// Subject line of the stale issue alert.
#[must_use]
pub fn issue_alert_subject(repo: &RepositorySlug, threshold_days: u32) -> String {
    format!("[ALERT] Issues Open Beyond {threshold_days} Days - {repo}")
}

/// Subject line of the pull request update.
#[must_use]
pub fn pull_request_update_subject(repo: &RepositorySlug) -> String {
    format!("[UPDATE] Pull Requests Merged or Closed - {repo}")
}

/// Renders the stale issue alert for `issues`, in the order given.
///
/// # Errors
///
/// Returns [`NotificationError::Render`] when a template fails to render.
pub fn render_issue_alert(
    repo: &RepositorySlug,
    threshold_days: u32,
    issues: &[Issue],
    now: DateTime<Utc>,
) -> Result<RenderedNotification, NotificationError> {
    let views: Vec<IssueView<'_>> = issues
        .iter()
        .map(|issue| IssueView {
            number: issue.number,
            title: &issue.title,
            age_days: issue.age_days(now),
            created_on: issue.created_at.format("%Y-%m-%d").to_string(),
            labels: label_names(&issue.labels),
            assignees: &issue.assignees,
            url: &issue.html_url,
        })
        .collect();

    let ctx = context! {
        repository => repo.to_string(),
        repository_url => repo.html_url(),
        generated_at => format_timestamp(now),
        threshold_days => threshold_days,
        issues => views,
    };

    Ok(RenderedNotification {
        subject: issue_alert_subject(repo, threshold_days),
        content: render_pair(ISSUE_ALERT_HTML, ISSUE_ALERT_TEXT, &ctx)?,
    })
}

/// Renders the pull request update for `pull_requests`, in the order given.
///
/// # Errors
///
/// Returns [`NotificationError::Render`] when a template fails to render.
pub fn render_pull_request_update(
    repo: &RepositorySlug,
    window: &LookbackWindow,
    pull_requests: &[PullRequest],
) -> Result<RenderedNotification, NotificationError> {
    let views: Vec<PullRequestView<'_>> = pull_requests
        .iter()
        .map(|pr| PullRequestView {
            number: pr.number,
            title: &pr.title,
            status: pr.resolution().to_string(),
            resolved_at: pr.resolved_at().map_or_else(String::new, format_timestamp),
            labels: label_names(&pr.labels),
            assignees: &pr.assignees,
            url: &pr.html_url,
        })
        .collect();

    let ctx = context! {
        repository => repo.to_string(),
        repository_url => repo.html_url(),
        generated_at => format_timestamp(window.ending_at()),
        lookback_hours => window.hours(),
        pull_requests => views,
    };

    Ok(RenderedNotification {
        subject: pull_request_update_subject(repo),
        content: render_pair(PULL_REQUEST_UPDATE_HTML, PULL_REQUEST_UPDATE_TEXT, &ctx)?,
    })
}

fn label_names(labels: &[Label]) -> Vec<&str> {
    labels.iter().map(|label| label.name.as_str()).collect()
}

fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M UTC").to_string()
}

fn environment() -> Result<Environment<'static>, NotificationError> {
    let mut env = Environment::new();
    env.set_trim_blocks(true);
    env.set_lstrip_blocks(true);

    let templates = [
        (ISSUE_ALERT_HTML, include_str!("templates/issue_alert.html")),
        (ISSUE_ALERT_TEXT, include_str!("templates/issue_alert.txt")),
        (
            PULL_REQUEST_UPDATE_HTML,
            include_str!("templates/pull_request_update.html"),
        ),
        (
            PULL_REQUEST_UPDATE_TEXT,
            include_str!("templates/pull_request_update.txt"),
        ),
    ];
    for (name, source) in templates {
        env.add_template(name, source)
            .map_err(|e| NotificationError::Render {
                message: format!("invalid template {name}: {e}"),
            })?;
    }
    Ok(env)
}

fn render_pair(
    html_name: &str,
    text_name: &str,
    ctx: &minijinja::Value,
) -> Result<FormattedContent, NotificationError> {
    let env = environment()?;
    let render = |name: &str| {
        env.get_template(name)
            .and_then(|tmpl| tmpl.render(ctx))
            .map_err(|e| NotificationError::Render {
                message: format!("template {name} failed: {e}"),
            })
    };

    Ok(FormattedContent {
        html: render(html_name)?,
        text: render(text_name)?,
    })
}
