//! Personal access token wrapper.

use crate::config::ConfigError;

/// Personal access token wrapper enforcing presence.
#[derive(Clone, PartialEq, Eq)]
pub struct PersonalAccessToken(String);

impl PersonalAccessToken {
    /// Validates that the token is non-empty and trims whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingField`] when the supplied string is blank.
    pub fn new(token: impl AsRef<str>) -> Result<Self, ConfigError> {
        let trimmed = token.as_ref().trim();
        if trimmed.is_empty() {
            return Err(ConfigError::MissingField {
                field: "token",
                hint: "use --token, REPOWATCH_TOKEN, or GITHUB_TOKEN",
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the token value.
    #[must_use]
    pub const fn value(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for PersonalAccessToken {
    fn as_ref(&self) -> &str {
        self.value()
    }
}

impl std::fmt::Debug for PersonalAccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PersonalAccessToken(***)")
    }
}
