//! Repository data sources.
//!
//! The decision pipeline reads issues and pull requests through the
//! [`RepositoryDataSource`] trait. The direct GitHub backend lives in
//! [`crate::github`] and the MCP-proxied backend in [`crate::mcp`]; both
//! honour the same contract, so the pipeline does not know which one it is
//! talking to.

mod error;
mod model;
mod repository;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use error::DataSourceError;
pub use model::{
    Issue, IssueState, Label, LookbackWindow, PullRequest, RepositoryInfo, Resolution,
};
pub use repository::{RepositoryName, RepositoryOwner, RepositorySlug};

use async_trait::async_trait;

/// Read-only access to a repository's issues, pull requests and headline
/// metadata.
///
/// Every operation is an idempotent read. Listings make no ordering
/// promise; the pipeline imposes its own ordering.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RepositoryDataSource: Send + Sync {
    /// List every open issue (pull requests excluded).
    async fn list_open_issues(&self, repo: &RepositorySlug)
    -> Result<Vec<Issue>, DataSourceError>;

    /// List pull requests merged or closed within `window`.
    ///
    /// Sources may return extra pull requests; the pipeline filters again
    /// against the same window.
    async fn list_recent_pull_requests(
        &self,
        repo: &RepositorySlug,
        window: &LookbackWindow,
    ) -> Result<Vec<PullRequest>, DataSourceError>;

    /// Fetch the repository's description and counters.
    async fn repository_info(
        &self,
        repo: &RepositorySlug,
    ) -> Result<RepositoryInfo, DataSourceError>;
}

#[async_trait]
impl<T> RepositoryDataSource for Box<T>
where
    T: RepositoryDataSource + ?Sized,
{
    async fn list_open_issues(
        &self,
        repo: &RepositorySlug,
    ) -> Result<Vec<Issue>, DataSourceError> {
        (**self).list_open_issues(repo).await
    }

    async fn list_recent_pull_requests(
        &self,
        repo: &RepositorySlug,
        window: &LookbackWindow,
    ) -> Result<Vec<PullRequest>, DataSourceError> {
        (**self).list_recent_pull_requests(repo, window).await
    }

    async fn repository_info(
        &self,
        repo: &RepositorySlug,
    ) -> Result<RepositoryInfo, DataSourceError> {
        (**self).repository_info(repo).await
    }
}
