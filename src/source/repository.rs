//! Identity wrappers for the monitored repository.

use std::fmt;

use crate::config::ConfigError;

/// Repository owner wrapper to avoid stringly typed parameters.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RepositoryOwner(String);

impl RepositoryOwner {
    /// Validates that the owner is non-blank and contains no path separator.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for blank or slash-bearing input.
    pub fn new(value: &str) -> Result<Self, ConfigError> {
        validate_segment("owner", value).map(Self)
    }

    /// Borrow the owner value.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Repository name wrapper to prevent parameter mix-ups.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RepositoryName(String);

impl RepositoryName {
    /// Validates that the name is non-blank and contains no path separator.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for blank or slash-bearing input.
    pub fn new(value: &str) -> Result<Self, ConfigError> {
        validate_segment("repo", value).map(Self)
    }

    /// Borrow the repository name.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// The owner/name pair of the monitored repository.
///
/// # Example
///
/// ```
/// use repowatch::RepositorySlug;
///
/// let slug = RepositorySlug::new("octocat", "hello-world").expect("valid slug");
/// assert_eq!(slug.to_string(), "octocat/hello-world");
/// assert_eq!(slug.html_url(), "https://github.com/octocat/hello-world");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RepositorySlug {
    owner: RepositoryOwner,
    name: RepositoryName,
}

impl RepositorySlug {
    /// Creates a slug from owner and repository name strings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] when either part is blank or
    /// contains a `/`.
    pub fn new(owner: &str, name: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            owner: RepositoryOwner::new(owner)?,
            name: RepositoryName::new(name)?,
        })
    }

    /// Repository owner.
    #[must_use]
    pub const fn owner(&self) -> &RepositoryOwner {
        &self.owner
    }

    /// Repository name.
    #[must_use]
    pub const fn name(&self) -> &RepositoryName {
        &self.name
    }

    /// Public GitHub page for the repository.
    #[must_use]
    pub fn html_url(&self) -> String {
        format!("https://github.com/{self}")
    }

    pub(crate) fn repository_path(&self) -> String {
        format!("/repos/{self}")
    }

    pub(crate) fn issues_path(&self) -> String {
        format!("/repos/{self}/issues")
    }

    pub(crate) fn pulls_path(&self) -> String {
        format!("/repos/{self}/pulls")
    }
}

impl fmt::Display for RepositorySlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner.as_str(), self.name.as_str())
    }
}

fn validate_segment(field: &'static str, value: &str) -> Result<String, ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::InvalidValue {
            field,
            message: "must not be blank".to_owned(),
        });
    }
    if trimmed.contains('/') {
        return Err(ConfigError::InvalidValue {
            field,
            message: format!("`{trimmed}` must not contain '/'"),
        });
    }
    Ok(trimmed.to_owned())
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::RepositorySlug;
    use crate::config::ConfigError;

    #[test]
    fn slug_builds_api_paths() {
        let slug = RepositorySlug::new("octo", "cat").expect("slug should be valid");

        assert_eq!(slug.issues_path(), "/repos/octo/cat/issues");
        assert_eq!(slug.pulls_path(), "/repos/octo/cat/pulls");
    }

    #[test]
    fn slug_trims_whitespace() {
        let slug = RepositorySlug::new(" octo ", "cat\n").expect("slug should be valid");

        assert_eq!(slug.to_string(), "octo/cat");
    }

    #[rstest]
    #[case::blank_owner("  ", "cat", "owner")]
    #[case::blank_repo("octo", "", "repo")]
    #[case::owner_with_slash("octo/cat", "cat", "owner")]
    fn slug_rejects_invalid_segments(
        #[case] owner: &str,
        #[case] name: &str,
        #[case] expected_field: &str,
    ) {
        let error = RepositorySlug::new(owner, name).expect_err("slug should be rejected");

        match error {
            ConfigError::InvalidValue { field, .. } => assert_eq!(field, expected_field),
            other => panic!("expected InvalidValue, got {other:?}"),
        }
    }
}
