//! Configuration errors.

use thiserror::Error;

/// Errors raised while loading or validating configuration.
///
/// These are fatal at startup: the binary reports them and exits non-zero.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// ortho-config failed to parse arguments or read a configuration file.
    #[error("failed to load configuration: {message}")]
    Load {
        /// Loader error detail.
        message: String,
    },

    /// A required field was not supplied by any layer.
    #[error("{field} is required ({hint})")]
    MissingField {
        /// Configuration field name.
        field: &'static str,
        /// How the user can supply it.
        hint: &'static str,
    },

    /// A field was supplied with an unusable value.
    #[error("invalid {field}: {message}")]
    InvalidValue {
        /// Configuration field name.
        field: &'static str,
        /// Why the value was rejected.
        message: String,
    },
}
