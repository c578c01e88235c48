//! Recording notification sink for tests.

use std::sync::Mutex;

use async_trait::async_trait;

use super::{FormattedContent, NotificationError, NotificationSink, Recipients};

/// A notification captured by [`RecordingSink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentNotification {
    /// Addresses the notification went to.
    pub recipients: Vec<String>,
    /// Subject line.
    pub subject: String,
    /// Rendered bodies.
    pub content: FormattedContent,
}

/// Sink that records every send attempt.
///
/// Sends whose subject starts with a configured prefix fail with a transport
/// error; the attempt is still recorded.
#[derive(Debug, Default)]
pub struct RecordingSink {
    attempts: Mutex<Vec<SentNotification>>,
    fail_prefix: Option<String>,
}

impl RecordingSink {
    /// Sink that accepts every notification.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sink that fails sends whose subject starts with `prefix`.
    #[must_use]
    pub fn failing_for(prefix: impl Into<String>) -> Self {
        Self {
            attempts: Mutex::new(Vec::new()),
            fail_prefix: Some(prefix.into()),
        }
    }

    /// Every attempted send, in order.
    #[must_use]
    pub fn attempts(&self) -> Vec<SentNotification> {
        self.attempts
            .lock()
            .map(|attempts| attempts.clone())
            .unwrap_or_default()
    }

    /// Subjects of every attempted send, in order.
    #[must_use]
    pub fn subjects(&self) -> Vec<String> {
        self.attempts()
            .into_iter()
            .map(|attempt| attempt.subject)
            .collect()
    }
}

#[async_trait]
impl NotificationSink for RecordingSink {
    async fn send(
        &self,
        recipients: &Recipients,
        subject: &str,
        content: &FormattedContent,
    ) -> Result<(), NotificationError> {
        if let Ok(mut attempts) = self.attempts.lock() {
            attempts.push(SentNotification {
                recipients: recipients.as_slice().to_vec(),
                subject: subject.to_owned(),
                content: content.clone(),
            });
        }

        match &self.fail_prefix {
            Some(prefix) if subject.starts_with(prefix.as_str()) => {
                Err(NotificationError::Transport {
                    message: "simulated delivery failure".to_owned(),
                })
            }
            _ => Ok(()),
        }
    }
}
