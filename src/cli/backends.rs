//! Builds the data source, notification sink, and tracking store selected
//! by configuration.

use repowatch::config::{SinkBackend, SourceBackend};
use repowatch::mcp::{McpClient, McpDataSource, McpNotificationSink};
use repowatch::notify::SmtpNotificationSink;
use repowatch::{
    InMemoryTrackingStore, NotificationSink, OctocrabDataSource, PersonalAccessToken,
    RepositoryDataSource, RepowatchConfig, SqliteTrackingStore, TrackingStore,
};

use super::error::AppError;

/// Builds the configured [`RepositoryDataSource`].
///
/// # Errors
///
/// Returns [`AppError::Config`] for missing or invalid backend settings and
/// [`AppError::DataSource`] when the GitHub client cannot be built.
pub fn data_source(config: &RepowatchConfig) -> Result<Box<dyn RepositoryDataSource>, AppError> {
    match config.source_backend()? {
        SourceBackend::Github => {
            let token = PersonalAccessToken::new(config.resolve_token()?)?;
            let source = OctocrabDataSource::for_token(&token, &config.api_base)?;
            Ok(Box::new(source))
        }
        SourceBackend::Mcp => {
            let client = McpClient::new(config.mcp_github_command()?, config.mcp_timeout()?);
            Ok(Box::new(McpDataSource::new(
                client,
                config.mcp_github_tools(),
            )))
        }
    }
}

/// Builds the configured [`NotificationSink`].
///
/// # Errors
///
/// Returns [`AppError::Config`] for missing or invalid backend settings and
/// [`AppError::Notification`] when lettre rejects the SMTP settings.
pub fn notification_sink(config: &RepowatchConfig) -> Result<Box<dyn NotificationSink>, AppError> {
    match config.sink_backend()? {
        SinkBackend::Smtp => {
            let sink = SmtpNotificationSink::new(&config.smtp_settings()?)?;
            Ok(Box::new(sink))
        }
        SinkBackend::Mcp => {
            let client = McpClient::new(config.mcp_email_command()?, config.mcp_timeout()?);
            Ok(Box::new(McpNotificationSink::new(
                client,
                config.mcp_email_tool.as_str(),
            )))
        }
    }
}

/// Builds the tracking store: `SQLite` when `database_url` is set, memory
/// otherwise.
///
/// # Errors
///
/// Returns [`AppError::Persistence`] when the database URL is blank.
pub fn tracking_store(config: &RepowatchConfig) -> Result<Box<dyn TrackingStore>, AppError> {
    match config.database_url.as_deref() {
        Some(url) => Ok(Box::new(SqliteTrackingStore::new(url)?)),
        None => {
            tracing::warn!("no database_url configured; tracking is kept in memory");
            Ok(Box::new(InMemoryTrackingStore::new()))
        }
    }
}

/// Short description of where tracking is kept, for reports.
#[must_use]
pub fn tracking_description(config: &RepowatchConfig) -> String {
    config
        .database_url
        .as_deref()
        .map_or_else(|| "in-memory".to_owned(), |url| format!("sqlite ({url})"))
}
