//! Repowatch library crate: a GitHub repository polling agent.
//!
//! Each run fetches open issues and recently resolved pull requests, picks
//! out the issues that have been open too long and the pull requests merged
//! or closed inside the lookback window, emails a summary of each, and
//! records what was sent so the next run does not repeat it.
//!
//! Issues and pull requests come from either the GitHub REST API
//! ([`github`]) or a GitHub MCP server ([`mcp`]). Notifications go out
//! through SMTP ([`notify`]) or an email MCP server. Tracking lives in
//! memory or in `SQLite` ([`persistence`]).

pub mod config;
pub mod github;
pub mod logging;
pub mod mcp;
pub mod monitor;
pub mod notify;
pub mod persistence;
pub mod source;
pub mod telemetry;
pub mod tracking;

pub use config::{ConfigError, OperationMode, RepowatchConfig};
pub use github::{OctocrabDataSource, PersonalAccessToken};
pub use monitor::{Monitor, MonitorError, MonitorSettings, RunState, Scheduler};
pub use notify::{NotificationError, NotificationSink, Recipients};
pub use persistence::{PersistenceError, SqliteTrackingStore};
pub use source::{DataSourceError, RepositoryDataSource, RepositorySlug};
pub use tracking::{InMemoryTrackingStore, TrackingRecord, TrackingStore};
