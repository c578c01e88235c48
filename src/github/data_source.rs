//! Octocrab-backed repository data source.

use async_trait::async_trait;
use octocrab::{Octocrab, Page};

use crate::source::{
    DataSourceError, Issue, LookbackWindow, PullRequest, RepositoryDataSource, RepositoryInfo,
    RepositorySlug,
};

use super::client::build_octocrab_client;
use super::error_mapping::map_octocrab_error;
use super::models::{ApiIssue, ApiPullRequest, ApiRepository};
use super::token::PersonalAccessToken;

/// Default GitHub API base URL.
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

const PER_PAGE: &str = "100";

/// Default upper bound on pull request pages walked per run.
const MAX_PULL_REQUEST_PAGES: usize = 10;

/// Repository data source that calls the GitHub REST API directly.
pub struct OctocrabDataSource {
    client: Octocrab,
    max_pull_request_pages: usize,
}

impl OctocrabDataSource {
    /// Creates a data source from an Octocrab client.
    #[must_use]
    pub const fn new(client: Octocrab) -> Self {
        Self {
            client,
            max_pull_request_pages: MAX_PULL_REQUEST_PAGES,
        }
    }

    /// Caps how many pull request pages one listing walks. Values below one
    /// are raised to one.
    #[must_use]
    pub fn with_max_pull_request_pages(mut self, pages: usize) -> Self {
        self.max_pull_request_pages = pages.max(1);
        self
    }

    /// Builds an authenticated client against `api_base`.
    ///
    /// # Errors
    ///
    /// Returns `DataSourceError::InvalidSettings` when the base URI cannot be
    /// parsed or Octocrab fails to construct a client.
    pub fn for_token(
        token: &PersonalAccessToken,
        api_base: &str,
    ) -> Result<Self, DataSourceError> {
        let octocrab = build_octocrab_client(token, api_base)?;
        Ok(Self::new(octocrab))
    }
}

#[async_trait]
impl RepositoryDataSource for OctocrabDataSource {
    async fn list_open_issues(
        &self,
        repo: &RepositorySlug,
    ) -> Result<Vec<Issue>, DataSourceError> {
        let query_params = [("state", "open"), ("per_page", PER_PAGE)];

        let first_page: Page<ApiIssue> = self
            .client
            .get(repo.issues_path(), Some(&query_params))
            .await
            .map_err(|error| map_octocrab_error("list issues", &error))?;

        let all_items = self
            .client
            .all_pages(first_page)
            .await
            .map_err(|error| map_octocrab_error("list issues", &error))?;

        Ok(all_items
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
        let query_params = [
            ("state", "closed"),
            ("sort", "updated"),
            ("direction", "desc"),
            ("per_page", PER_PAGE),
        ];

        let mut page: Page<ApiPullRequest> = self
            .client
            .get(repo.pulls_path(), Some(&query_params))
            .await
            .map_err(|error| map_octocrab_error("list pulls", &error))?;

        let window_start = window.starts_at();
        let mut collected: Vec<ApiPullRequest> = Vec::new();
        let mut pages_read = 1;

        loop {
            // Results are sorted by update time, so once a page ends before the
            // window nothing further can qualify.
            let reached_older = page
                .items
                .last()
                .and_then(|last| last.updated_at)
                .is_some_and(|updated_at| updated_at < window_start);
            collected.append(&mut page.items);

            if reached_older || page.next.is_none() {
                break;
            }
            if pages_read >= self.max_pull_request_pages {
                tracing::warn!(
                    repository = %repo,
                    page_cap = self.max_pull_request_pages,
                    window_start = %window_start,
                    "pull request listing hit the page cap before leaving the lookback window; older resolutions are skipped"
                );
                break;
            }

            match self
                .client
                .get_page::<ApiPullRequest>(&page.next)
                .await
                .map_err(|error| map_octocrab_error("list pulls", &error))?
            {
                Some(next_page) => {
                    page = next_page;
                    pages_read += 1;
                }
                None => break,
            }
        }

        Ok(collected
            .into_iter()
            .map(PullRequest::from)
            .filter(|pr| pr.resolved_at().is_some_and(|at| window.contains(at)))
            .collect())
    }

    async fn repository_info(
        &self,
        repo: &RepositorySlug,
    ) -> Result<RepositoryInfo, DataSourceError> {
        let repository: ApiRepository = self
            .client
            .get(repo.repository_path(), None::<&()>)
            .await
            .map_err(|error| map_octocrab_error("get repository", &error))?;
        Ok(RepositoryInfo::from(repository))
    }
}
