//! JSON-RPC client for MCP servers spoken to over stdio.
//!
//! Messages are newline-delimited JSON. The first request on a connection
//! performs the `initialize` handshake followed by the
//! `notifications/initialized` notification; tool calls follow as
//! `tools/call` requests. Server-initiated messages and responses to other
//! ids are skipped.

use std::process::Stdio;
use std::time::Duration;

use serde_json::{Value, json};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::process::{Child, Command};
use tokio::sync::Mutex;

use super::{McpCommand, McpError};

/// Protocol revision announced during `initialize`.
const PROTOCOL_VERSION: &str = "2024-11-05";

type BoxedReader = Box<dyn AsyncBufRead + Send + Unpin>;
type BoxedWriter = Box<dyn AsyncWrite + Send + Unpin>;

struct Connection {
    reader: BoxedReader,
    writer: BoxedWriter,
    next_id: u64,
    initialized: bool,
    // Held so the server is killed when the connection is dropped.
    _child: Option<Child>,
}

impl Connection {
    fn new(reader: BoxedReader, writer: BoxedWriter, child: Option<Child>) -> Self {
        Self {
            reader,
            writer,
            next_id: 1,
            initialized: false,
            _child: child,
        }
    }

    async fn call_tool(&mut self, name: &str, arguments: Value) -> Result<Value, McpError> {
        if !self.initialized {
            self.initialize().await?;
        }

        let result = self
            .request(
                "tools/call",
                json!({ "name": name, "arguments": arguments }),
            )
            .await?;
        decode_tool_result(name, &result)
    }

    async fn initialize(&mut self) -> Result<(), McpError> {
        self.request(
            "initialize",
            json!({
                "protocolVersion": PROTOCOL_VERSION,
                "capabilities": {},
                "clientInfo": {
                    "name": env!("CARGO_PKG_NAME"),
                    "version": env!("CARGO_PKG_VERSION")
                }
            }),
        )
        .await?;
        self.write_message(&json!({
            "jsonrpc": "2.0",
            "method": "notifications/initialized"
        }))
        .await?;
        self.initialized = true;
        Ok(())
    }

    async fn request(&mut self, method: &str, params: Value) -> Result<Value, McpError> {
        let id = self.next_id;
        self.next_id += 1;

        self.write_message(&json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params
        }))
        .await?;

        loop {
            let message = self.read_message().await?;
            if message.get("method").is_some()
                || message.get("id").and_then(Value::as_u64) != Some(id)
            {
                continue;
            }
            return response_result(&message);
        }
    }

    async fn read_message(&mut self) -> Result<Value, McpError> {
        loop {
            let mut line = String::new();
            let read = self
                .reader
                .read_line(&mut line)
                .await
                .map_err(|error| McpError::Io {
                    message: format!("failed reading MCP response: {error}"),
                })?;
            if read == 0 {
                return Err(McpError::Closed);
            }

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            match serde_json::from_str::<Value>(trimmed) {
                Ok(message) => return Ok(message),
                Err(error) => {
                    tracing::debug!(%error, "skipping non-JSON line from MCP server");
                }
            }
        }
    }

    async fn write_message(&mut self, message: &Value) -> Result<(), McpError> {
        let mut encoded = serde_json::to_vec(message).map_err(|error| McpError::Protocol {
            message: format!("failed to encode MCP request: {error}"),
        })?;
        encoded.push(b'\n');
        self.writer
            .write_all(&encoded)
            .await
            .map_err(|error| McpError::Io {
                message: format!("failed writing MCP request: {error}"),
            })?;
        self.writer.flush().await.map_err(|error| McpError::Io {
            message: format!("failed flushing MCP request: {error}"),
        })
    }
}

/// Client for one MCP server.
///
/// A client built with [`McpClient::new`] launches its server on first use
/// and relaunches it after a transport failure. A client built from streams
/// cannot reconnect once its connection is lost.
pub struct McpClient {
    command: Option<McpCommand>,
    timeout: Duration,
    connection: Mutex<Option<Connection>>,
}

impl McpClient {
    /// Client that launches `command` on first use.
    #[must_use]
    pub fn new(command: McpCommand, timeout: Duration) -> Self {
        Self {
            command: Some(command),
            timeout,
            connection: Mutex::new(None),
        }
    }

    /// Client over an existing pair of streams.
    #[must_use]
    pub fn from_streams<R, W>(reader: R, writer: W, timeout: Duration) -> Self
    where
        R: AsyncRead + Send + Unpin + 'static,
        W: AsyncWrite + Send + Unpin + 'static,
    {
        let connection = Connection::new(Box::new(BufReader::new(reader)), Box::new(writer), None);
        Self {
            command: None,
            timeout,
            connection: Mutex::new(Some(connection)),
        }
    }

    /// Calls `name` with `arguments` and returns the tool's JSON payload.
    ///
    /// The payload is `structuredContent` when present, otherwise the first
    /// text content block parsed as JSON (or kept as a string when it is not
    /// JSON).
    ///
    /// # Errors
    ///
    /// Returns [`McpError`] when the server cannot be reached, times out,
    /// answers with a JSON-RPC error, or the tool reports `isError`.
    pub async fn call_tool(&self, name: &str, arguments: Value) -> Result<Value, McpError> {
        let mut guard = self.connection.lock().await;
        if guard.is_none() {
            *guard = Some(self.launch()?);
        }
        let Some(connection) = guard.as_mut() else {
            return Err(McpError::Closed);
        };

        let result = tokio::time::timeout(self.timeout, connection.call_tool(name, arguments))
            .await
            .unwrap_or_else(|_| {
                Err(McpError::Timeout {
                    method: name.to_owned(),
                    seconds: self.timeout.as_secs(),
                })
            });

        if let Err(error) = &result
            && error.is_transport()
        {
            tracing::warn!(tool = name, %error, "dropping MCP connection");
            *guard = None;
        }
        result
    }

    fn launch(&self) -> Result<Connection, McpError> {
        let Some(command) = &self.command else {
            return Err(McpError::Closed);
        };

        let spawn_error = |message: String| McpError::Spawn {
            command: command.to_string(),
            message,
        };

        let mut child = Command::new(command.program())
            .args(command.args())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|error| spawn_error(error.to_string()))?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| spawn_error("stdin was not captured".to_owned()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| spawn_error("stdout was not captured".to_owned()))?;

        tracing::info!(command = %command, "started MCP server");
        Ok(Connection::new(
            Box::new(BufReader::new(stdout)),
            Box::new(stdin),
            Some(child),
        ))
    }
}

fn response_result(message: &Value) -> Result<Value, McpError> {
    if let Some(error) = message.get("error") {
        return Err(McpError::Rpc {
            code: error.get("code").and_then(Value::as_i64).unwrap_or_default(),
            message: error
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("unknown error")
                .to_owned(),
        });
    }

    message
        .get("result")
        .cloned()
        .ok_or_else(|| McpError::Protocol {
            message: "response carried neither result nor error".to_owned(),
        })
}

fn first_text(result: &Value) -> Option<&str> {
    result
        .get("content")
        .and_then(Value::as_array)?
        .iter()
        .find(|block| block.get("type").and_then(Value::as_str) == Some("text"))
        .and_then(|block| block.get("text"))
        .and_then(Value::as_str)
}

fn decode_tool_result(tool: &str, result: &Value) -> Result<Value, McpError> {
    if result.get("isError").and_then(Value::as_bool) == Some(true) {
        return Err(McpError::ToolFailed {
            tool: tool.to_owned(),
            message: first_text(result)
                .unwrap_or("tool reported an error")
                .to_owned(),
        });
    }

    if let Some(structured) = result.get("structuredContent") {
        return Ok(structured.clone());
    }

    Ok(first_text(result).map_or(Value::Null, |text| {
        serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_owned()))
    }))
}
