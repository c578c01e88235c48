//! Notification delivery.
//!
//! The pipeline hands a [`FormattedContent`] and a subject to a
//! [`NotificationSink`]. Delivery goes through SMTP ([`SmtpNotificationSink`])
//! or through an MCP email server ([`crate::mcp::McpNotificationSink`]).
//! Rendering lives in [`content`].

pub mod content;
mod error;
mod recipients;
mod smtp;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use content::RenderedNotification;
pub use error::NotificationError;
pub use recipients::Recipients;
pub use smtp::{DEFAULT_SMTP_PORT, SmtpNotificationSink, SmtpSecurity, SmtpSettings};

use async_trait::async_trait;

/// HTML and plain-text renderings of one notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedContent {
    /// HTML body.
    pub html: String,
    /// Plain-text body.
    pub text: String,
}

/// Destination for notifications.
///
/// A send is attempted once; failures are reported to the caller and never
/// retried by the sink.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Deliver `content` to every recipient under `subject`.
    async fn send(
        &self,
        recipients: &Recipients,
        subject: &str,
        content: &FormattedContent,
    ) -> Result<(), NotificationError>;
}

#[async_trait]
impl<T> NotificationSink for Box<T>
where
    T: NotificationSink + ?Sized,
{
    async fn send(
        &self,
        recipients: &Recipients,
        subject: &str,
        content: &FormattedContent,
    ) -> Result<(), NotificationError> {
        (**self).send(recipients, subject, content).await
    }
}

/// Sink that accepts and discards every notification.
///
/// Used where a pipeline needs a sink but must not deliver, such as dry
/// runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNotificationSink;

#[async_trait]
impl NotificationSink for NoopNotificationSink {
    async fn send(
        &self,
        _recipients: &Recipients,
        subject: &str,
        _content: &FormattedContent,
    ) -> Result<(), NotificationError> {
        tracing::debug!(subject, "discarding notification");
        Ok(())
    }
}
