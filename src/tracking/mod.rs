//! Cross-run memory of sent notifications.
//!
//! A [`TrackingRecord`] maps each notified issue or pull request to the state
//! it was notified about. The pipeline loads it through a [`TrackingStore`]
//! at the start of a run and persists it after the notification stages.
//! The `SQLite` store lives in [`crate::persistence`].

mod record;
mod store;

pub use record::{ItemKind, TrackedEntry, TrackingKey, TrackingRecord, UnknownItemKind};
pub use store::{InMemoryTrackingStore, TrackingStore};

#[cfg(test)]
pub use store::MockTrackingStore;
