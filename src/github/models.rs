//! GitHub REST payloads and their conversion into domain models.
//!
//! Types prefixed with `Api` are deserialisation targets. They are shared
//! with the MCP backend, whose GitHub server answers in the same shape.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

use crate::source::{Issue, IssueState, Label, PullRequest, RepositoryInfo};

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum ApiUser {
    Detailed { login: Option<String> },
    Login(String),
}

impl ApiUser {
    fn into_login(self) -> Option<String> {
        match self {
            Self::Detailed { login } => login,
            Self::Login(login) => Some(login),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum ApiLabel {
    Detailed {
        name: String,
        color: Option<String>,
    },
    Name(String),
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiIssue {
    pub(crate) number: u64,
    pub(crate) title: Option<String>,
    pub(crate) state: Option<String>,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: Option<DateTime<Utc>>,
    pub(crate) html_url: Option<String>,
    #[serde(default)]
    pub(crate) labels: Option<Vec<ApiLabel>>,
    #[serde(default)]
    pub(crate) assignees: Option<Vec<ApiUser>>,
    /// Present when the "issue" is really a pull request.
    #[serde(default)]
    pub(crate) pull_request: Option<Value>,
}

impl ApiIssue {
    /// Returns true when the issues endpoint handed back a pull request.
    pub(crate) const fn is_pull_request(&self) -> bool {
        self.pull_request.is_some()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiPullRequest {
    pub(crate) number: u64,
    pub(crate) title: Option<String>,
    pub(crate) merged_at: Option<DateTime<Utc>>,
    pub(crate) closed_at: Option<DateTime<Utc>>,
    pub(crate) updated_at: Option<DateTime<Utc>>,
    pub(crate) html_url: Option<String>,
    #[serde(default)]
    pub(crate) labels: Option<Vec<ApiLabel>>,
    #[serde(default)]
    pub(crate) assignees: Option<Vec<ApiUser>>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiRepository {
    pub(crate) full_name: String,
    pub(crate) description: Option<String>,
    pub(crate) html_url: Option<String>,
    #[serde(default)]
    pub(crate) open_issues_count: u64,
    #[serde(default)]
    pub(crate) stargazers_count: u64,
    #[serde(default)]
    pub(crate) forks_count: u64,
}

impl From<ApiRepository> for RepositoryInfo {
    fn from(value: ApiRepository) -> Self {
        let html_url = value
            .html_url
            .unwrap_or_else(|| format!("https://github.com/{}", value.full_name));
        Self {
            full_name: value.full_name,
            description: value.description.filter(|text| !text.trim().is_empty()),
            html_url,
            open_issues_count: value.open_issues_count,
            stargazers_count: value.stargazers_count,
            forks_count: value.forks_count,
        }
    }
}

impl From<ApiLabel> for Label {
    fn from(value: ApiLabel) -> Self {
        match value {
            ApiLabel::Detailed { name, color } => Self { name, color },
            ApiLabel::Name(name) => Self { name, color: None },
        }
    }
}

fn convert_labels(labels: Option<Vec<ApiLabel>>) -> Vec<Label> {
    labels
        .unwrap_or_default()
        .into_iter()
        .map(Label::from)
        .collect()
}

fn convert_assignees(assignees: Option<Vec<ApiUser>>) -> Vec<String> {
    assignees
        .unwrap_or_default()
        .into_iter()
        .filter_map(ApiUser::into_login)
        .collect()
}

impl From<ApiIssue> for Issue {
    fn from(value: ApiIssue) -> Self {
        Self {
            number: value.number,
            title: value.title.unwrap_or_default(),
            state: value
                .state
                .as_deref()
                .map_or(IssueState::Open, IssueState::from_api),
            created_at: value.created_at,
            updated_at: value.updated_at,
            labels: convert_labels(value.labels),
            assignees: convert_assignees(value.assignees),
            html_url: value.html_url.unwrap_or_default(),
        }
    }
}

impl From<ApiPullRequest> for PullRequest {
    fn from(value: ApiPullRequest) -> Self {
        Self {
            number: value.number,
            title: value.title.unwrap_or_default(),
            merged_at: value.merged_at,
            closed_at: value.closed_at,
            labels: convert_labels(value.labels),
            assignees: convert_assignees(value.assignees),
            html_url: value.html_url.unwrap_or_default(),
        }
    }
}
