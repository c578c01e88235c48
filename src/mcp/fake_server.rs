//! In-process MCP server over `tokio::io::duplex` for unit tests.

use std::time::Duration;

use serde_json::{Value, json};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::task::JoinHandle;

use super::McpClient;

/// Request timeout used by clients returned from [`connect`].
pub(crate) const TEST_TIMEOUT: Duration = Duration::from_secs(5);

/// How the fake server answers a request.
pub(crate) enum FakeReply {
    /// A `result` object.
    Result(Value),
    /// A JSON-RPC `error` object.
    Error { code: i64, message: String },
    /// No answer at all.
    Silent,
}

impl FakeReply {
    /// Tool result carrying `structuredContent`.
    pub(crate) fn structured(payload: Value) -> Self {
        Self::Result(json!({
            "content": [{ "type": "text", "text": payload.to_string() }],
            "structuredContent": payload
        }))
    }

    /// Tool result with a single text block.
    pub(crate) fn text(text: &str) -> Self {
        Self::Result(json!({ "content": [{ "type": "text", "text": text }] }))
    }

    /// Tool result flagged with `isError`.
    pub(crate) fn tool_error(text: &str) -> Self {
        Self::Result(json!({
            "content": [{ "type": "text", "text": text }],
            "isError": true
        }))
    }

    /// JSON-RPC error response.
    pub(crate) fn rpc_error(code: i64, message: &str) -> Self {
        Self::Error {
            code,
            message: message.to_owned(),
        }
    }
}

/// Connects a client to a fake server that answers `initialize` itself and
/// every other request through `handler(method, params)`.
///
/// The returned task yields every message the server received once the
/// client is dropped.
pub(crate) fn connect<F>(handler: F) -> (McpClient, JoinHandle<Vec<Value>>)
where
    F: Fn(&str, &Value) -> FakeReply + Send + 'static,
{
    let (client_io, server_io) = tokio::io::duplex(64 * 1024);
    let (client_read, client_write) = tokio::io::split(client_io);
    let (server_read, mut server_write) = tokio::io::split(server_io);

    let server = tokio::spawn(async move {
        let mut lines = BufReader::new(server_read).lines();
        let mut seen = Vec::new();
        while let Ok(Some(line)) = lines.next_line().await {
            let Ok(message) = serde_json::from_str::<Value>(&line) else {
                continue;
            };
            seen.push(message.clone());
            let Some(id) = message.get("id").cloned() else {
                continue;
            };
            let method = message
                .get("method")
                .and_then(Value::as_str)
                .unwrap_or_default();
            let params = message.get("params").cloned().unwrap_or(Value::Null);

            let reply = if method == "initialize" {
                FakeReply::Result(json!({
                    "protocolVersion": "2024-11-05",
                    "capabilities": { "tools": {} },
                    "serverInfo": { "name": "fake", "version": "0.0.0" }
                }))
            } else {
                handler(method, &params)
            };

            let response = match reply {
                FakeReply::Result(result) => json!({ "jsonrpc": "2.0", "id": id, "result": result }),
                FakeReply::Error { code, message } => json!({
                    "jsonrpc": "2.0",
                    "id": id,
                    "error": { "code": code, "message": message }
                }),
                FakeReply::Silent => continue,
            };

            let mut encoded = response.to_string();
            encoded.push('\n');
            if server_write.write_all(encoded.as_bytes()).await.is_err() {
                break;
            }
        }
        seen
    });

    (
        McpClient::from_streams(client_read, client_write, TEST_TIMEOUT),
        server,
    )
}
