//! Notification sink backed by an MCP email server.

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::notify::{FormattedContent, NotificationError, NotificationSink, Recipients};

use super::McpClient;

/// Default email tool name.
pub const DEFAULT_EMAIL_TOOL: &str = "email_send";

/// [`NotificationSink`] that calls an MCP email tool with
/// `{to, subject, body, html_body}`.
pub struct McpNotificationSink {
    client: McpClient,
    tool: String,
}

impl McpNotificationSink {
    /// Wraps a client calling `tool`.
    #[must_use]
    pub fn new(client: McpClient, tool: impl Into<String>) -> Self {
        Self {
            client,
            tool: tool.into(),
        }
    }
}

#[async_trait]
impl NotificationSink for McpNotificationSink {
    async fn send(
        &self,
        recipients: &Recipients,
        subject: &str,
        content: &FormattedContent,
    ) -> Result<(), NotificationError> {
        let arguments = json!({
            "to": recipients.as_slice(),
            "subject": subject,
            "body": content.text,
            "html_body": content.html
        });

        let payload = self
            .client
            .call_tool(&self.tool, arguments)
            .await
            .map_err(|error| NotificationError::Transport {
                message: error.to_string(),
            })?;

        // Servers that report `success: false` rejected the message.
        if payload.get("success").and_then(Value::as_bool) == Some(false) {
            let detail = payload
                .get("error")
                .and_then(Value::as_str)
                .unwrap_or("email tool reported failure");
            return Err(NotificationError::Transport {
                message: format!("{} rejected the message: {detail}", self.tool),
            });
        }

        tracing::info!(
            tool = %self.tool,
            recipients = recipients.len(),
            subject,
            "notification sent through MCP"
        );
        Ok(())
    }
}
