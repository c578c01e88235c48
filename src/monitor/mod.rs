//! Repository monitoring: per-run state, classification, the decision
//! pipeline and its scheduler.

mod classify;
mod error;
mod pipeline;
mod scheduler;
mod settings;
mod state;

pub use classify::{actionable_issues, actionable_pull_requests};
pub use error::{MonitorError, RunStage};
pub use pipeline::{Monitor, update_tracking};
pub use scheduler::Scheduler;
pub use settings::{
    DEFAULT_CHECK_INTERVAL_HOURS, DEFAULT_ISSUE_THRESHOLD_DAYS, DEFAULT_PR_LOOKBACK_HOURS,
    MonitorSettings,
};
pub use state::{NotificationOutcome, RunState};
