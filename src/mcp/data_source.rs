//! Repository data source proxied through an MCP GitHub server.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use crate::github::models::{ApiIssue, ApiPullRequest, ApiRepository};
use crate::source::{
    DataSourceError, Issue, LookbackWindow, PullRequest, RepositoryDataSource, RepositoryInfo,
    RepositorySlug,
};

use super::{McpClient, McpError};

/// Default tool listing issues.
pub const DEFAULT_ISSUES_TOOL: &str = "github_get_issues";
/// Default tool listing pull requests.
pub const DEFAULT_PULL_REQUESTS_TOOL: &str = "github_get_pull_requests";
/// Default tool describing the repository.
pub const DEFAULT_REPOSITORY_TOOL: &str = "github_get_repository";

/// Tool names exposed by the GitHub MCP server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct McpGithubTools {
    /// Tool returning issues for `{owner, repo, state}`.
    pub issues: String,
    /// Tool returning pull requests for `{owner, repo, state, lookback_hours}`.
    pub pull_requests: String,
    /// Tool returning the repository object for `{owner, repo}`.
    pub repository: String,
}

impl Default for McpGithubTools {
    fn default() -> Self {
        Self {
            issues: DEFAULT_ISSUES_TOOL.to_owned(),
            pull_requests: DEFAULT_PULL_REQUESTS_TOOL.to_owned(),
            repository: DEFAULT_REPOSITORY_TOOL.to_owned(),
        }
    }
}

/// [`RepositoryDataSource`] backed by MCP tool calls.
pub struct McpDataSource {
    client: McpClient,
    tools: McpGithubTools,
}

impl McpDataSource {
    /// Wraps a client using the given tool names.
    #[must_use]
    pub const fn new(client: McpClient, tools: McpGithubTools) -> Self {
        Self { client, tools }
    }

    async fn call_raw(&self, tool: &str, arguments: Value) -> Result<Value, DataSourceError> {
        self.client
            .call_tool(tool, arguments)
            .await
            .map_err(|error| map_mcp_error(tool, error))
    }

    async fn call<T: DeserializeOwned>(
        &self,
        tool: &str,
        arguments: Value,
    ) -> Result<Vec<T>, DataSourceError> {
        let payload = self.call_raw(tool, arguments).await?;
        decode_items(tool, payload)
    }
}

#[async_trait]
impl RepositoryDataSource for McpDataSource {
    async fn list_open_issues(
        &self,
        repo: &RepositorySlug,
    ) -> Result<Vec<Issue>, DataSourceError> {
        let arguments = json!({
            "owner": repo.owner().as_str(),
            "repo": repo.name().as_str(),
            "state": "open"
        });
        let items: Vec<ApiIssue> = self.call(&self.tools.issues, arguments).await?;

        Ok(items
            .into_iter()
            .filter(|item| !item.is_pull_request())
            .map(Issue::from)
            .filter(Issue::is_open)
            .collect())
    }

    async fn list_recent_pull_requests(
        &self,
        repo: &RepositorySlug,
        window: &LookbackWindow,
    ) -> Result<Vec<PullRequest>, DataSourceError> {
        let arguments = json!({
            "owner": repo.owner().as_str(),
            "repo": repo.name().as_str(),
            "state": "all",
            "lookback_hours": window.hours()
        });
        let items: Vec<ApiPullRequest> = self.call(&self.tools.pull_requests, arguments).await?;

        Ok(items
            .into_iter()
            .map(PullRequest::from)
            .filter(|pr| pr.resolved_at().is_some_and(|at| window.contains(at)))
            .collect())
    }

    async fn repository_info(
        &self,
        repo: &RepositorySlug,
    ) -> Result<RepositoryInfo, DataSourceError> {
        let tool = &self.tools.repository;
        let arguments = json!({
            "owner": repo.owner().as_str(),
            "repo": repo.name().as_str()
        });
        let payload = self.call_raw(tool, arguments).await?;
        let repository: ApiRepository =
            serde_json::from_value(payload).map_err(|error| DataSourceError::Malformed {
                message: format!("{tool} returned an unexpected payload: {error}"),
            })?;
        Ok(RepositoryInfo::from(repository))
    }
}

/// Accepts either a bare array or an object wrapping one under `items`.
fn decode_items<T: DeserializeOwned>(tool: &str, payload: Value) -> Result<Vec<T>, DataSourceError> {
    let items = match payload {
        Value::Array(items) => Value::Array(items),
        Value::Object(mut object) => object.remove("items").unwrap_or(Value::Null),
        Value::Null => return Ok(Vec::new()),
        other => other,
    };

    serde_json::from_value(items).map_err(|error| DataSourceError::Malformed {
        message: format!("{tool} returned an unexpected payload: {error}"),
    })
}

fn map_mcp_error(tool: &str, error: McpError) -> DataSourceError {
    match error {
        McpError::ToolFailed { tool, message } => DataSourceError::Tool { tool, message },
        McpError::Rpc { .. } => DataSourceError::Tool {
            tool: tool.to_owned(),
            message: error.to_string(),
        },
        McpError::Protocol { .. } => DataSourceError::Malformed {
            message: error.to_string(),
        },
        McpError::Spawn { .. } | McpError::Io { .. } | McpError::Closed | McpError::Timeout { .. } => {
            DataSourceError::Network {
                message: error.to_string(),
            }
        }
    }
}
