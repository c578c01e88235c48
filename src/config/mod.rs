//! Application configuration loaded from CLI, environment, and files.
//!
//! This module provides a unified configuration struct that merges values
//! from command-line arguments, environment variables, and configuration
//! files using ortho-config's layered approach.
//!
//! # Precedence
//!
//! Configuration values are loaded with the following precedence (lowest to
//! highest):
//!
//! 1. **Defaults** – Built-in application defaults
//! 2. **Configuration file** – `.repowatch.toml` in current directory, home
//!    directory, or XDG config directory
//! 3. **Environment variables** – `REPOWATCH_*`, plus the legacy
//!    `GITHUB_TOKEN`
//! 4. **Command-line arguments** – `--owner`/`-o`, `--repo`/`-r`, and so on
//!
//! # Configuration File
//!
//! ```toml
//! owner = "octocat"
//! repo = "hello-world"
//! recipients = "team@example.com, lead@example.com"
//! issue_threshold_days = 7
//! pr_lookback_hours = 24
//! check_interval_hours = 24
//! smtp_host = "smtp.example.com"
//! smtp_from = "repowatch@example.com"
//! database_url = "repowatch.sqlite"
//! ```

mod backend;
mod error;

use std::env;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};
use url::Url;

pub use backend::{SinkBackend, SourceBackend};
pub use error::ConfigError;

use crate::github::DEFAULT_API_BASE;
use crate::logging::LogFormat;
use crate::mcp::{
    DEFAULT_EMAIL_TOOL, DEFAULT_ISSUES_TOOL, DEFAULT_PULL_REQUESTS_TOOL, DEFAULT_REPOSITORY_TOOL,
    McpCommand, McpGithubTools,
};
use crate::monitor::{
    DEFAULT_CHECK_INTERVAL_HOURS, DEFAULT_ISSUE_THRESHOLD_DAYS, DEFAULT_PR_LOOKBACK_HOURS,
    MonitorSettings,
};
use crate::notify::{DEFAULT_SMTP_PORT, Recipients, SmtpSecurity, SmtpSettings};
use crate::source::RepositorySlug;

/// Default timeout for a single MCP request, in seconds.
pub const DEFAULT_MCP_TIMEOUT_SECONDS: u64 = 30;

const SECONDS_PER_HOUR: u64 = 3_600;

/// Operation mode determined by CLI arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationMode {
    /// Apply database migrations and exit.
    MigrateDatabase,
    /// Fetch and classify, print a report, send nothing.
    DryRun,
    /// Run the pipeline once and exit.
    RunOnce,
    /// Run the pipeline on a fixed interval until interrupted.
    Scheduler,
}

/// Application configuration supporting CLI, environment, and file sources.
///
/// # Environment Variables
///
/// - `REPOWATCH_OWNER` or `--owner`: Repository owner
/// - `REPOWATCH_REPO` or `--repo`: Repository name
/// - `REPOWATCH_TOKEN`, `GITHUB_TOKEN`, or `--token`: Authentication token
/// - `REPOWATCH_RECIPIENTS` or `--recipients`: Comma-separated addresses
/// - `REPOWATCH_DATABASE_URL` or `--database-url`: Local `SQLite` database path
///
/// # Example
///
/// ```no_run
/// use ortho_config::OrthoConfig;
/// use repowatch::RepowatchConfig;
///
/// let config = RepowatchConfig::load().expect("failed to load configuration");
/// let settings = config.monitor_settings().expect("owner, repo and recipients required");
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, OrthoConfig)]
#[serde(default)]
#[ortho_config(
    prefix = "REPOWATCH",
    discovery(
        dotfile_name = ".repowatch.toml",
        config_file_name = "repowatch.toml",
        app_name = "repowatch"
    )
)]
pub struct RepowatchConfig {
    /// Repository owner (e.g., "octocat").
    ///
    /// Can be provided via:
    /// - CLI: `--owner <OWNER>` or `-o <OWNER>`
    /// - Environment: `REPOWATCH_OWNER`
    /// - Config file: `owner = "..."`
    #[ortho_config(cli_short = 'o')]
    pub owner: Option<String>,

    /// Repository name (e.g., "hello-world").
    ///
    /// Can be provided via:
    /// - CLI: `--repo <REPO>` or `-r <REPO>`
    /// - Environment: `REPOWATCH_REPO`
    /// - Config file: `repo = "..."`
    #[ortho_config(cli_short = 'r')]
    pub repo: Option<String>,

    /// Personal access token for GitHub API authentication.
    ///
    /// Can be provided via:
    /// - CLI: `--token <TOKEN>` or `-t <TOKEN>`
    /// - Environment: `REPOWATCH_TOKEN` or `GITHUB_TOKEN` (legacy)
    /// - Config file: `token = "..."`
    #[ortho_config(cli_short = 't')]
    pub token: Option<String>,

    /// Base URL of the GitHub REST API. Override for GitHub Enterprise.
    #[ortho_config()]
    pub api_base: String,

    /// Issues open this many whole days or longer are alerted.
    #[ortho_config()]
    pub issue_threshold_days: u32,

    /// Hours between scheduled runs.
    #[ortho_config()]
    pub check_interval_hours: u32,

    /// Pull requests merged or closed within this many hours are reported.
    #[ortho_config()]
    pub pr_lookback_hours: u32,

    /// Comma-separated notification recipients.
    ///
    /// Can be provided via:
    /// - CLI: `--recipients <LIST>`
    /// - Environment: `REPOWATCH_RECIPIENTS`
    /// - Config file: `recipients = "a@example.com, b@example.com"`
    #[ortho_config()]
    pub recipients: Option<String>,

    /// SMTP relay host.
    #[ortho_config()]
    pub smtp_host: Option<String>,

    /// SMTP relay port. Defaults to 587.
    #[ortho_config()]
    pub smtp_port: u16,

    /// SMTP login user.
    #[ortho_config()]
    pub smtp_username: Option<String>,

    /// SMTP login password.
    #[ortho_config()]
    pub smtp_password: Option<String>,

    /// Sender address for outgoing mail.
    #[ortho_config()]
    pub smtp_from: Option<String>,

    /// SMTP connection security: `starttls`, `tls`, or `none`.
    #[ortho_config()]
    pub smtp_security: String,

    /// Data source backend: `github` or `mcp`.
    #[ortho_config()]
    pub source_backend: String,

    /// Notification backend: `smtp` or `mcp`.
    #[ortho_config()]
    pub sink_backend: String,

    /// Command line launching the GitHub MCP server.
    #[ortho_config()]
    pub mcp_github_command: Option<String>,

    /// Command line launching the email MCP server.
    #[ortho_config()]
    pub mcp_email_command: Option<String>,

    /// MCP tool that lists issues.
    #[ortho_config()]
    pub mcp_issues_tool: String,

    /// MCP tool that lists pull requests.
    #[ortho_config()]
    pub mcp_pulls_tool: String,

    /// MCP tool that describes the repository.
    #[ortho_config()]
    pub mcp_repository_tool: String,

    /// MCP tool that sends email.
    #[ortho_config()]
    pub mcp_email_tool: String,

    /// Seconds to wait for any single MCP response.
    #[ortho_config()]
    pub mcp_timeout_seconds: u64,

    /// Local `SQLite` database URL/path used for notification tracking.
    ///
    /// Without it the scheduler keeps tracking in memory, so restarting the
    /// process forgets what was already sent.
    ///
    /// Can be provided via:
    /// - CLI: `--database-url <PATH>`
    /// - Environment: `REPOWATCH_DATABASE_URL`
    /// - Config file: `database_url = "..."`
    #[ortho_config()]
    pub database_url: Option<String>,

    /// Re-alert issues that were closed and reopened since their last alert.
    ///
    /// Note: `ortho_config` does not load boolean values from the
    /// environment, so this is CLI or config file only.
    #[ortho_config()]
    pub realert_on_reopen: bool,

    /// Runs a single pass and exits.
    #[ortho_config()]
    pub once: bool,

    /// Prints a status report without sending or recording anything.
    #[ortho_config()]
    pub dry_run: bool,

    /// Runs database migrations and exits.
    ///
    /// Can be provided via:
    /// - CLI: `--migrate-db`
    /// - Config file: `migrate_db = true`
    #[ortho_config()]
    pub migrate_db: bool,

    /// Log line format: `compact` or `json`.
    #[ortho_config()]
    pub log_format: String,
}

impl Default for RepowatchConfig {
    fn default() -> Self {
        Self {
            owner: None,
            repo: None,
            token: None,
            api_base: DEFAULT_API_BASE.to_owned(),
            issue_threshold_days: DEFAULT_ISSUE_THRESHOLD_DAYS,
            check_interval_hours: DEFAULT_CHECK_INTERVAL_HOURS,
            pr_lookback_hours: DEFAULT_PR_LOOKBACK_HOURS,
            recipients: None,
            smtp_host: None,
            smtp_port: DEFAULT_SMTP_PORT,
            smtp_username: None,
            smtp_password: None,
            smtp_from: None,
            smtp_security: SmtpSecurity::default().to_string(),
            source_backend: SourceBackend::default().to_string(),
            sink_backend: SinkBackend::default().to_string(),
            mcp_github_command: None,
            mcp_email_command: None,
            mcp_issues_tool: DEFAULT_ISSUES_TOOL.to_owned(),
            mcp_pulls_tool: DEFAULT_PULL_REQUESTS_TOOL.to_owned(),
            mcp_repository_tool: DEFAULT_REPOSITORY_TOOL.to_owned(),
            mcp_email_tool: DEFAULT_EMAIL_TOOL.to_owned(),
            mcp_timeout_seconds: DEFAULT_MCP_TIMEOUT_SECONDS,
            database_url: None,
            realert_on_reopen: false,
            once: false,
            dry_run: false,
            migrate_db: false,
            log_format: LogFormat::default().to_string(),
        }
    }
}

/// Returns the trimmed value, treating blank strings as absent.
fn non_blank(value: Option<&String>) -> Option<&str> {
    value.map(|raw| raw.trim()).filter(|raw| !raw.is_empty())
}

impl RepowatchConfig {
    /// Determines the operation mode from the mode flags.
    ///
    /// `migrate_db` wins over `dry_run`, which wins over `once`; with no flag
    /// set the scheduler runs.
    #[must_use]
    pub const fn operation_mode(&self) -> OperationMode {
        if self.migrate_db {
            OperationMode::MigrateDatabase
        } else if self.dry_run {
            OperationMode::DryRun
        } else if self.once {
            OperationMode::RunOnce
        } else {
            OperationMode::Scheduler
        }
    }

    /// Parses the GitHub API base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] when the value is not an
    /// absolute `http` or `https` URL.
    pub fn api_base(&self) -> Result<Url, ConfigError> {
        let url = Url::parse(self.api_base.trim()).map_err(|error| ConfigError::InvalidValue {
            field: "api_base",
            message: error.to_string(),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidValue {
                field: "api_base",
                message: format!("unsupported scheme `{}`", url.scheme()),
            });
        }
        Ok(url)
    }

    /// Resolves the token from configuration or the legacy `GITHUB_TOKEN`
    /// environment variable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingField`] when no token source provides a
    /// value.
    pub fn resolve_token(&self) -> Result<String, ConfigError> {
        self.token
            .clone()
            .or_else(|| env::var("GITHUB_TOKEN").ok())
            .ok_or(ConfigError::MissingField {
                field: "token",
                hint: "use --token, REPOWATCH_TOKEN, or GITHUB_TOKEN",
            })
    }

    /// Returns the monitored repository.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingField`] when owner or repo is missing,
    /// or [`ConfigError::InvalidValue`] when either is malformed.
    pub fn repository(&self) -> Result<RepositorySlug, ConfigError> {
        let owner = non_blank(self.owner.as_ref()).ok_or(ConfigError::MissingField {
            field: "owner",
            hint: "use --owner or -o",
        })?;
        let repo = non_blank(self.repo.as_ref()).ok_or(ConfigError::MissingField {
            field: "repo",
            hint: "use --repo or -r",
        })?;
        RepositorySlug::new(owner, repo)
    }

    /// Returns the parsed recipient list.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingField`] when no address is configured.
    pub fn recipient_list(&self) -> Result<Recipients, ConfigError> {
        Recipients::parse(self.recipients.as_deref().unwrap_or_default())
    }

    /// Builds the validated settings for a monitoring run.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the repository or recipients are missing,
    /// or the lookback window is zero.
    pub fn monitor_settings(&self) -> Result<MonitorSettings, ConfigError> {
        if self.pr_lookback_hours == 0 {
            return Err(ConfigError::InvalidValue {
                field: "pr_lookback_hours",
                message: "must be greater than zero".to_owned(),
            });
        }

        let mut settings = MonitorSettings::new(self.repository()?, self.recipient_list()?);
        settings.issue_threshold_days = self.issue_threshold_days;
        settings.pr_lookback_hours = self.pr_lookback_hours;
        settings.realert_on_reopen = self.realert_on_reopen;
        Ok(settings)
    }

    /// Interval between scheduled runs.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] when the interval is zero.
    pub fn check_interval(&self) -> Result<Duration, ConfigError> {
        if self.check_interval_hours == 0 {
            return Err(ConfigError::InvalidValue {
                field: "check_interval_hours",
                message: "must be greater than zero".to_owned(),
            });
        }
        Ok(Duration::from_secs(
            u64::from(self.check_interval_hours) * SECONDS_PER_HOUR,
        ))
    }

    /// Selected data source backend.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for an unknown backend name.
    pub fn source_backend(&self) -> Result<SourceBackend, ConfigError> {
        self.source_backend.parse()
    }

    /// Selected notification backend.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for an unknown backend name.
    pub fn sink_backend(&self) -> Result<SinkBackend, ConfigError> {
        self.sink_backend.parse()
    }

    /// Selected log format.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for an unknown format name.
    pub fn log_format(&self) -> Result<LogFormat, ConfigError> {
        self.log_format.parse()
    }

    /// Builds the SMTP settings.
    ///
    /// The sender defaults to `smtp_username` when `smtp_from` is unset.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingField`] when the host or sender is
    /// missing, and [`ConfigError::InvalidValue`] for an unknown security
    /// mode or a username without a password.
    pub fn smtp_settings(&self) -> Result<SmtpSettings, ConfigError> {
        let host = non_blank(self.smtp_host.as_ref()).ok_or(ConfigError::MissingField {
            field: "smtp_host",
            hint: "use --smtp-host or REPOWATCH_SMTP_HOST",
        })?;
        let username = non_blank(self.smtp_username.as_ref()).map(ToOwned::to_owned);
        let from = non_blank(self.smtp_from.as_ref())
            .or(username.as_deref())
            .ok_or(ConfigError::MissingField {
                field: "smtp_from",
                hint: "use --smtp-from or REPOWATCH_SMTP_FROM, or set smtp_username",
            })?
            .to_owned();
        let password = self.smtp_password.clone().filter(|value| !value.is_empty());
        if username.is_some() && password.is_none() {
            return Err(ConfigError::InvalidValue {
                field: "smtp_password",
                message: "a password is required when smtp_username is set".to_owned(),
            });
        }

        Ok(SmtpSettings {
            host: host.to_owned(),
            port: self.smtp_port,
            username,
            password,
            from,
            security: self.smtp_security.parse()?,
        })
    }

    /// Command launching the GitHub MCP server.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingField`] when unset, or
    /// [`ConfigError::InvalidValue`] when blank.
    pub fn mcp_github_command(&self) -> Result<McpCommand, ConfigError> {
        let raw = self
            .mcp_github_command
            .as_deref()
            .ok_or(ConfigError::MissingField {
                field: "mcp_github_command",
                hint: "required when source_backend is mcp",
            })?;
        McpCommand::parse("mcp_github_command", raw)
    }

    /// Command launching the email MCP server.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingField`] when unset, or
    /// [`ConfigError::InvalidValue`] when blank.
    pub fn mcp_email_command(&self) -> Result<McpCommand, ConfigError> {
        let raw = self
            .mcp_email_command
            .as_deref()
            .ok_or(ConfigError::MissingField {
                field: "mcp_email_command",
                hint: "required when sink_backend is mcp",
            })?;
        McpCommand::parse("mcp_email_command", raw)
    }

    /// Tool names used against the GitHub MCP server.
    #[must_use]
    pub fn mcp_github_tools(&self) -> McpGithubTools {
        McpGithubTools {
            issues: self.mcp_issues_tool.clone(),
            pull_requests: self.mcp_pulls_tool.clone(),
            repository: self.mcp_repository_tool.clone(),
        }
    }

    /// Per-request MCP timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] when the timeout is zero.
    pub fn mcp_timeout(&self) -> Result<Duration, ConfigError> {
        if self.mcp_timeout_seconds == 0 {
            return Err(ConfigError::InvalidValue {
                field: "mcp_timeout_seconds",
                message: "must be greater than zero".to_owned(),
            });
        }
        Ok(Duration::from_secs(self.mcp_timeout_seconds))
    }

    /// Returns the database URL or an error if missing.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingField`] when no URL is configured.
    pub fn require_database_url(&self) -> Result<&str, ConfigError> {
        self.database_url
            .as_deref()
            .ok_or(ConfigError::MissingField {
                field: "database_url",
                hint: "use --database-url or REPOWATCH_DATABASE_URL",
            })
    }

    /// Checks that every value the selected mode needs is present and
    /// well-formed, without building any client.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.log_format()?;
        let mode = self.operation_mode();
        if mode == OperationMode::MigrateDatabase {
            self.require_database_url()?;
            return Ok(());
        }

        self.monitor_settings()?;
        match self.source_backend()? {
            SourceBackend::Github => {
                self.api_base()?;
                self.resolve_token()?;
            }
            SourceBackend::Mcp => {
                self.mcp_github_command()?;
                self.mcp_timeout()?;
            }
        }
        if mode == OperationMode::DryRun {
            return Ok(());
        }

        match self.sink_backend()? {
            SinkBackend::Smtp => {
                self.smtp_settings()?;
            }
            SinkBackend::Mcp => {
                self.mcp_email_command()?;
                self.mcp_timeout()?;
            }
        }
        match mode {
            OperationMode::RunOnce => {
                self.require_database_url()?;
            }
            OperationMode::Scheduler => {
                self.check_interval()?;
            }
            OperationMode::MigrateDatabase | OperationMode::DryRun => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests;
