//! Errors that abort a monitoring run.

use std::fmt;

use thiserror::Error;

use crate::persistence::PersistenceError;
use crate::source::DataSourceError;

/// Pipeline stage a run failed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStage {
    /// Fetching issues and pull requests.
    Fetch,
    /// Loading the tracking record.
    LoadTracking,
    /// Persisting the updated tracking record.
    PersistTracking,
}

impl RunStage {
    /// Stable name used in logs and telemetry.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fetch => "fetch",
            Self::LoadTracking => "load_tracking",
            Self::PersistTracking => "persist_tracking",
        }
    }
}

impl fmt::Display for RunStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that stop a run before tracking is updated.
///
/// Notification failures are not here: they are recorded in the run state
/// and the run continues.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MonitorError {
    /// The data source failed.
    #[error("{stage} stage failed: {source}")]
    DataSource {
        /// Stage that failed.
        stage: RunStage,
        /// Underlying error.
        source: DataSourceError,
    },

    /// The tracking store failed.
    #[error("{stage} stage failed: {source}")]
    Persistence {
        /// Stage that failed.
        stage: RunStage,
        /// Underlying error.
        source: PersistenceError,
    },
}

impl MonitorError {
    /// Stage the run failed in.
    #[must_use]
    pub const fn stage(&self) -> RunStage {
        match self {
            Self::DataSource { stage, .. } | Self::Persistence { stage, .. } => *stage,
        }
    }
}
