//! Binary-level error type.
//!
//! Every variant exits the process with status 1.

use repowatch::{
    ConfigError, DataSourceError, MonitorError, NotificationError, PersistenceError,
};
use thiserror::Error;

/// Everything that can stop the binary.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded or validated.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The data source could not be constructed.
    #[error(transparent)]
    DataSource(#[from] DataSourceError),

    /// The notification sink could not be constructed.
    #[error(transparent)]
    Notification(#[from] NotificationError),

    /// Migrations or the tracking store failed outside a run.
    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    /// A monitoring run failed.
    #[error(transparent)]
    Monitor(#[from] MonitorError),

    /// The log subscriber could not be installed.
    #[error("failed to initialise logging: {message}")]
    Logging {
        /// Subscriber error detail.
        message: String,
    },

    /// Writing a report failed.
    #[error("failed to write output: {message}")]
    Io {
        /// I/O error detail.
        message: String,
    },
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: error.to_string(),
        }
    }
}
