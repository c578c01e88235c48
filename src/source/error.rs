//! Error types surfaced by repository data sources.

use thiserror::Error;

/// Errors raised while fetching issues or pull requests.
///
/// Every variant is fatal to the current monitoring run only; the scheduler
/// logs it and retries at the next tick.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DataSourceError {
    /// The credentials were rejected.
    #[error("GitHub rejected the token: {message}")]
    Authentication {
        /// GitHub error message returned with the 401/403 response.
        message: String,
    },

    /// The API returned a non-authentication error.
    #[error("GitHub API error: {message}")]
    Api {
        /// Response detail describing the failure.
        message: String,
    },

    /// The API rate limit was exhausted.
    #[error("GitHub API rate limit exceeded: {message}")]
    RateLimitExceeded {
        /// Error message from GitHub.
        message: String,
    },

    /// Networking failed while calling the source.
    #[error("network error talking to the data source: {message}")]
    Network {
        /// Transport-level error detail.
        message: String,
    },

    /// The source answered with data that could not be decoded.
    #[error("malformed data from the data source: {message}")]
    Malformed {
        /// Decoding failure detail.
        message: String,
    },

    /// An MCP tool call failed or reported an error result.
    #[error("MCP tool {tool} failed: {message}")]
    Tool {
        /// Name of the tool that was called.
        tool: String,
        /// Failure detail.
        message: String,
    },

    /// The source could not be constructed from its settings.
    #[error("invalid data source settings: {message}")]
    InvalidSettings {
        /// Details about the invalid setting.
        message: String,
    },
}
