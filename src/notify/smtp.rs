//! SMTP delivery through lettre.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use lettre::message::{Mailbox, MultiPart, SinglePart, header::ContentType};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::config::ConfigError;

use super::{FormattedContent, NotificationError, NotificationSink, Recipients};

/// Default SMTP submission port.
pub const DEFAULT_SMTP_PORT: u16 = 587;

/// How the SMTP connection is secured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SmtpSecurity {
    /// Plain connection upgraded with STARTTLS.
    #[default]
    StartTls,
    /// Implicit TLS from the first byte.
    Tls,
    /// No encryption. Only for local relays and tests.
    None,
}

impl FromStr for SmtpSecurity {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "starttls" => Ok(Self::StartTls),
            "tls" => Ok(Self::Tls),
            "none" => Ok(Self::None),
            other => Err(ConfigError::InvalidValue {
                field: "smtp_security",
                message: format!("`{other}` is not one of starttls, tls, none"),
            }),
        }
    }
}

impl fmt::Display for SmtpSecurity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::StartTls => "starttls",
            Self::Tls => "tls",
            Self::None => "none",
        })
    }
}

/// Validated SMTP settings.
#[derive(Clone, PartialEq, Eq)]
pub struct SmtpSettings {
    /// Relay host name.
    pub host: String,
    /// Relay port.
    pub port: u16,
    /// Login user, when the relay requires authentication.
    pub username: Option<String>,
    /// Login password, used together with `username`.
    pub password: Option<String>,
    /// Sender address.
    pub from: String,
    /// Connection security.
    pub security: SmtpSecurity,
}

impl fmt::Debug for SmtpSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("from", &self.from)
            .field("security", &self.security)
            .finish()
    }
}

/// Notification sink that emails through an SMTP relay.
pub struct SmtpNotificationSink {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpNotificationSink {
    /// Builds the transport. No connection is opened until the first send.
    ///
    /// # Errors
    ///
    /// Returns [`NotificationError::InvalidAddress`] when the sender cannot
    /// be parsed, or [`NotificationError::InvalidSettings`] when lettre
    /// rejects the relay configuration.
    pub fn new(settings: &SmtpSettings) -> Result<Self, NotificationError> {
        let from = parse_mailbox(&settings.from)?;

        let relay = match settings.security {
            SmtpSecurity::StartTls => {
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)
                    .map_err(|e| invalid_relay(&settings.host, &e))?
            }
            SmtpSecurity::Tls => AsyncSmtpTransport::<Tokio1Executor>::relay(&settings.host)
                .map_err(|e| invalid_relay(&settings.host, &e))?,
            SmtpSecurity::None => {
                AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&settings.host)
            }
        };

        let builder = relay.port(settings.port);
        let transport = match (&settings.username, &settings.password) {
            (Some(username), Some(password)) => builder
                .credentials(Credentials::new(username.clone(), password.clone()))
                .build(),
            _ => builder.build(),
        };

        Ok(Self { transport, from })
    }
}

#[async_trait]
impl NotificationSink for SmtpNotificationSink {
    async fn send(
        &self,
        recipients: &Recipients,
        subject: &str,
        content: &FormattedContent,
    ) -> Result<(), NotificationError> {
        let message = build_message(&self.from, recipients, subject, content)?;

        self.transport
            .send(message)
            .await
            .map_err(|e| NotificationError::Transport {
                message: e.to_string(),
            })?;

        tracing::info!(
            recipients = recipients.len(),
            subject,
            "notification email sent"
        );
        Ok(())
    }
}

/// Assembles a multipart/alternative message with text and HTML parts.
pub(crate) fn build_message(
    from: &Mailbox,
    recipients: &Recipients,
    subject: &str,
    content: &FormattedContent,
) -> Result<Message, NotificationError> {
    let mut builder = Message::builder().from(from.clone()).subject(subject);
    for address in recipients.iter() {
        builder = builder.to(parse_mailbox(address)?);
    }

    builder
        .multipart(
            MultiPart::alternative()
                .singlepart(
                    SinglePart::builder()
                        .header(ContentType::TEXT_PLAIN)
                        .body(content.text.clone()),
                )
                .singlepart(
                    SinglePart::builder()
                        .header(ContentType::TEXT_HTML)
                        .body(content.html.clone()),
                ),
        )
        .map_err(|e| NotificationError::Build {
            message: e.to_string(),
        })
}

fn parse_mailbox(address: &str) -> Result<Mailbox, NotificationError> {
    address
        .parse::<Mailbox>()
        .map_err(|e| NotificationError::InvalidAddress {
            address: address.to_owned(),
            message: e.to_string(),
        })
}

fn invalid_relay(host: &str, error: &lettre::transport::smtp::Error) -> NotificationError {
    NotificationError::InvalidSettings {
        message: format!("cannot use SMTP relay {host}: {error}"),
    }
}
