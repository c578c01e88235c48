//! Recipient list parsing.

use std::fmt;

use crate::config::ConfigError;

/// Non-empty list of email recipients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipients(Vec<String>);

impl Recipients {
    /// Parses a comma-separated address list.
    ///
    /// Blank entries are skipped and duplicates collapse to their first
    /// occurrence.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingField`] when no address remains, or
    /// [`ConfigError::InvalidValue`] when an entry has no `@`.
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let mut addresses: Vec<String> = Vec::new();
        for entry in raw.split(',').map(str::trim).filter(|entry| !entry.is_empty()) {
            if !entry.contains('@') {
                return Err(ConfigError::InvalidValue {
                    field: "recipients",
                    message: format!("`{entry}` is not an email address"),
                });
            }
            if !addresses.iter().any(|existing| existing == entry) {
                addresses.push(entry.to_owned());
            }
        }

        if addresses.is_empty() {
            return Err(ConfigError::MissingField {
                field: "recipients",
                hint: "use --recipients or REPOWATCH_RECIPIENTS with at least one address",
            });
        }
        Ok(Self(addresses))
    }

    /// Borrow the addresses in configuration order.
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Iterate over the addresses.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Number of recipients.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true when the list is empty, which a parsed list never is.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Recipients {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::Recipients;
    use crate::config::ConfigError;

    #[test]
    fn parse_trims_and_deduplicates() {
        let recipients = Recipients::parse(" a@example.com, ,b@example.com,a@example.com ")
            .expect("recipients should parse");

        assert_eq!(
            recipients.as_slice(),
            &["a@example.com".to_owned(), "b@example.com".to_owned()]
        );
        assert_eq!(recipients.to_string(), "a@example.com, b@example.com");
    }

    #[rstest]
    #[case::empty("")]
    #[case::only_separators(" , ,")]
    fn parse_rejects_empty_lists(#[case] raw: &str) {
        assert!(matches!(
            Recipients::parse(raw),
            Err(ConfigError::MissingField {
                field: "recipients",
                ..
            })
        ));
    }

    #[test]
    fn parse_rejects_entries_without_at_sign() {
        assert!(matches!(
            Recipients::parse("ops@example.com, nobody"),
            Err(ConfigError::InvalidValue {
                field: "recipients",
                ..
            })
        ));
    }
}
