//! Backend selectors for the data source and the notification sink.

use std::fmt;
use std::str::FromStr;

use super::ConfigError;

/// Where issues and pull requests come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SourceBackend {
    /// GitHub REST API through Octocrab.
    #[default]
    Github,
    /// A GitHub MCP server spoken to over stdio.
    Mcp,
}

impl FromStr for SourceBackend {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "github" => Ok(Self::Github),
            "mcp" => Ok(Self::Mcp),
            other => Err(ConfigError::InvalidValue {
                field: "source_backend",
                message: format!("`{other}` is not one of github, mcp"),
            }),
        }
    }
}

impl fmt::Display for SourceBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Github => "github",
            Self::Mcp => "mcp",
        })
    }
}

/// How notifications are delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SinkBackend {
    /// Direct SMTP delivery through lettre.
    #[default]
    Smtp,
    /// An email MCP server spoken to over stdio.
    Mcp,
}

impl FromStr for SinkBackend {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "smtp" => Ok(Self::Smtp),
            "mcp" => Ok(Self::Mcp),
            other => Err(ConfigError::InvalidValue {
                field: "sink_backend",
                message: format!("`{other}` is not one of smtp, mcp"),
            }),
        }
    }
}

impl fmt::Display for SinkBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Smtp => "smtp",
            Self::Mcp => "mcp",
        })
    }
}
