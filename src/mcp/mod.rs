//! Model Context Protocol backends.
//!
//! An MCP server is a child process spoken to with JSON-RPC 2.0 over its
//! stdin and stdout. [`McpDataSource`] reads issues and pull requests
//! through a GitHub MCP server and [`McpNotificationSink`] sends email
//! through an email MCP server; both sit behind the same traits as the
//! direct backends.

mod client;
mod command;
mod data_source;
mod error;
mod sink;

#[cfg(test)]
mod fake_server;

pub use client::McpClient;
pub use command::McpCommand;
pub use data_source::{
    DEFAULT_ISSUES_TOOL, DEFAULT_PULL_REQUESTS_TOOL, DEFAULT_REPOSITORY_TOOL, McpDataSource,
    McpGithubTools,
};
pub use error::McpError;
pub use sink::{DEFAULT_EMAIL_TOOL, McpNotificationSink};
