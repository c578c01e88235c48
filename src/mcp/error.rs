//! MCP client errors.

use thiserror::Error;

/// Errors raised while talking to an MCP server.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum McpError {
    /// The server process could not be started.
    #[error("failed to start MCP server `{command}`: {message}")]
    Spawn {
        /// Command line that was launched.
        command: String,
        /// OS error detail.
        message: String,
    },

    /// Reading from or writing to the server failed.
    #[error("MCP transport error: {message}")]
    Io {
        /// I/O error detail.
        message: String,
    },

    /// The server closed its output stream.
    #[error("MCP server closed the connection")]
    Closed,

    /// The server did not answer in time.
    #[error("MCP request {method} timed out after {seconds}s")]
    Timeout {
        /// JSON-RPC method or tool name.
        method: String,
        /// Configured timeout.
        seconds: u64,
    },

    /// The server answered with something that is not a valid response.
    #[error("MCP protocol error: {message}")]
    Protocol {
        /// What was wrong with the response.
        message: String,
    },

    /// The server answered with a JSON-RPC error object.
    #[error("MCP server returned error {code}: {message}")]
    Rpc {
        /// JSON-RPC error code.
        code: i64,
        /// Error message.
        message: String,
    },

    /// The tool ran and reported failure (`isError: true`).
    #[error("MCP tool {tool} reported an error: {message}")]
    ToolFailed {
        /// Tool name.
        tool: String,
        /// Text content of the error result.
        message: String,
    },
}

impl McpError {
    /// Returns true when the connection can no longer be trusted and must be
    /// re-established before the next request.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Spawn { .. } | Self::Io { .. } | Self::Closed | Self::Timeout { .. }
        )
    }
}
