//! Operational telemetry events and sinks.
//!
//! Each monitoring cycle ends in exactly one event: `CycleCompleted` when the
//! fetch succeeded, or `CycleAborted` when the run stopped early. Migrations
//! record the resulting schema version.

use serde::{Deserialize, Serialize};

/// A structured telemetry event emitted by repowatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TelemetryEvent {
    /// Records the current database schema version after migrations apply.
    SchemaVersionRecorded {
        /// Diesel migration version string (e.g. `20261019000000`).
        schema_version: String,
    },

    /// A monitoring cycle ran every stage.
    CycleCompleted {
        /// `owner/repo` being monitored.
        repository: String,
        /// Run timestamp (RFC 3339).
        run_at: String,
        /// Open issues returned by the data source.
        issues_fetched: usize,
        /// Recently resolved pull requests returned by the data source.
        pull_requests_fetched: usize,
        /// Issues included in the alert.
        actionable_issues: usize,
        /// Pull requests included in the update.
        actionable_pull_requests: usize,
        /// Outcome of the issue alert (`not_sent`, `sent`, `failed`).
        issue_alert: String,
        /// Outcome of the pull request update.
        pull_request_update: String,
    },

    /// A monitoring cycle stopped before updating tracking.
    CycleAborted {
        /// `owner/repo` being monitored.
        repository: String,
        /// Run timestamp (RFC 3339).
        run_at: String,
        /// Stage that failed.
        stage: String,
        /// Error message.
        error: String,
    },
}

/// A sink that can record telemetry events.
pub trait TelemetrySink: Send + Sync {
    /// Records a telemetry event.
    fn record(&self, event: TelemetryEvent);
}

/// Telemetry sink that drops all events.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopTelemetrySink;

impl TelemetrySink for NoopTelemetrySink {
    fn record(&self, _event: TelemetryEvent) {}
}

/// Forwards events to `tracing` as JSON under the `repowatch::telemetry`
/// target, so they follow whatever subscriber the binary installed.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingTelemetrySink;

impl TelemetrySink for TracingTelemetrySink {
    fn record(&self, event: TelemetryEvent) {
        let Ok(serialised) = serde_json::to_string(&event) else {
            return;
        };

        tracing::info!(target: "repowatch::telemetry", event = %serialised, "telemetry");
    }
}

/// Telemetry sink for tests.
#[cfg(any(test, feature = "test-support"))]
pub mod test_support {
    use std::sync::Mutex;

    use super::{TelemetryEvent, TelemetrySink};

    /// Captures every recorded event in memory.
    #[derive(Debug, Default)]
    pub struct RecordingSink {
        events: Mutex<Vec<TelemetryEvent>>,
    }

    impl RecordingSink {
        /// Drains the captured events.
        #[must_use]
        pub fn take(&self) -> Vec<TelemetryEvent> {
            self.events
                .lock()
                .map(|mut events| events.drain(..).collect())
                .unwrap_or_default()
        }
    }

    impl TelemetrySink for RecordingSink {
        fn record(&self, event: TelemetryEvent) {
            if let Ok(mut events) = self.events.lock() {
                events.push(event);
            }
        }
    }
}
