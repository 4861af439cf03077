//! Plain-text tool results on the wire.
//!
//! pmcp turns a tool's return value into text content with
//! `Value::to_string`, so a string result arrives quoted and escaped.
//! The hooks here decode those strings again before a response leaves the
//! server: [`ToolTextMiddleware`] for streamable HTTP and [`ToolTextTransport`]
//! for any [`Transport`] such as stdio.

use async_trait::async_trait;
use pmcp::server::http_middleware::{ServerHttpContext, ServerHttpMiddleware, ServerHttpResponse};
use pmcp::shared::{Transport, TransportMessage};
use pmcp::types::jsonrpc::ResponsePayload;
use serde_json::Value;

/// Decode JSON-encoded strings in the text content of a `tools/call` result.
///
/// Returns true if anything changed. Results without a `content` array are
/// left alone.
pub(crate) fn restore_tool_text(result: &mut Value) -> bool {
    let Some(content) = result.get_mut("content").and_then(Value::as_array_mut) else {
        return false;
    };

    let mut changed = false;
    for item in content {
        if item.get("type").and_then(Value::as_str) != Some("text") {
            continue;
        }
        let Some(text) = item.get_mut("text") else {
            continue;
        };
        let decoded = text
            .as_str()
            .and_then(|raw| serde_json::from_str::<String>(raw).ok());
        if let Some(decoded) = decoded {
            *text = Value::String(decoded);
            changed = true;
        }
    }
    changed
}

/// Streamable HTTP middleware restoring plain tool text in JSON-RPC responses
#[derive(Debug, Default)]
pub struct ToolTextMiddleware;

#[async_trait]
impl ServerHttpMiddleware for ToolTextMiddleware {
    async fn on_response(
        &self,
        response: &mut ServerHttpResponse,
        _context: &ServerHttpContext,
    ) -> pmcp::Result<()> {
        let Ok(mut message) = serde_json::from_slice::<Value>(&response.body) else {
            return Ok(());
        };

        let changed = message
            .get_mut("result")
            .is_some_and(restore_tool_text);
        if changed {
            response.body = serde_json::to_vec(&message)?;
        }
        Ok(())
    }
}

/// Transport wrapper restoring plain tool text in outgoing responses
#[derive(Debug)]
pub struct ToolTextTransport<T> {
    inner: T,
}

impl<T: Transport> ToolTextTransport<T> {
    /// Wrap a transport
    pub fn new(inner: T) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<T: Transport> Transport for ToolTextTransport<T> {
    async fn send(&mut self, mut message: TransportMessage) -> pmcp::Result<()> {
        if let TransportMessage::Response(response) = &mut message {
            if let ResponsePayload::Result(result) = &mut response.payload {
                restore_tool_text(result);
            }
        }
        self.inner.send(message).await
    }

    async fn receive(&mut self) -> pmcp::Result<TransportMessage> {
        self.inner.receive().await
    }

    async fn close(&mut self) -> pmcp::Result<()> {
        self.inner.close().await
    }

    fn is_connected(&self) -> bool {
        self.inner.is_connected()
    }

    fn transport_type(&self) -> &'static str {
        self.inner.transport_type()
    }
}
