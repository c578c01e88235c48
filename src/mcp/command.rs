//! MCP server command lines.

use std::fmt;

use crate::config::ConfigError;

/// Program and arguments used to launch an MCP server over stdio.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct McpCommand {
    program: String,
    args: Vec<String>,
}

impl McpCommand {
    /// Splits a whitespace-separated command line. Quoting is not supported.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for `field` when the command line
    /// is blank.
    pub fn parse(field: &'static str, raw: &str) -> Result<Self, ConfigError> {
        let mut parts = raw.split_whitespace().map(ToOwned::to_owned);
        let Some(program) = parts.next() else {
            return Err(ConfigError::InvalidValue {
                field,
                message: "command line must not be blank".to_owned(),
            });
        };
        Ok(Self {
            program,
            args: parts.collect(),
        })
    }

    /// Executable name or path.
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Arguments passed to the executable.
    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }
}

impl fmt::Display for McpCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}
