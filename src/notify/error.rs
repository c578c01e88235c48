//! Notification errors.

use thiserror::Error;

/// Errors raised while rendering or delivering a notification.
///
/// None of these abort a monitoring run: the stage records the failure and
/// the pipeline moves on.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NotificationError {
    /// A template failed to render.
    #[error("failed to render notification: {message}")]
    Render {
        /// Template engine error detail.
        message: String,
    },

    /// A recipient or sender address could not be parsed.
    #[error("invalid email address `{address}`: {message}")]
    InvalidAddress {
        /// Offending address.
        address: String,
        /// Parser error detail.
        message: String,
    },

    /// The message could not be assembled.
    #[error("failed to build email message: {message}")]
    Build {
        /// Builder error detail.
        message: String,
    },

    /// The transport refused or failed to deliver the message.
    #[error("failed to deliver notification: {message}")]
    Transport {
        /// Transport error detail.
        message: String,
    },

    /// The sink could not be constructed from its settings.
    #[error("invalid notification settings: {message}")]
    InvalidSettings {
        /// Details about the invalid setting.
        message: String,
    },
}
