//! Server loop: routes JSON-RPC requests to the tool registry.

use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::mcp::errors::{JsonRpcError, McpError, McpResult, ProtocolError};
use crate::mcp::protocol::{
    InitializeParams, InitializeResult, McpMessage, ServerCapabilities, ServerInfo,
    ToolsCapability,
};
use crate::mcp::tools::{ToolContext, ToolRegistry};
use crate::mcp::transport::McpTransport;
use crate::mcp::{MCP_PROTOCOL_VERSION, SERVER_NAME, SERVER_VERSION};

pub struct McpServer {
    registry: ToolRegistry,
    context: ToolContext,
}

impl McpServer {
    pub fn new(registry: ToolRegistry, context: ToolContext) -> Self {
        Self { registry, context }
    }

    /// Serve requests until the transport closes.
    pub async fn run<T: McpTransport>(&self, transport: &mut T) -> McpResult<()> {
        info!("{} v{} serving", SERVER_NAME, SERVER_VERSION);

        loop {
            let message = match transport.receive().await {
                Ok(message) => message,
                Err(McpError::Transport(_)) => {
                    info!("transport closed, shutting down");
                    return Ok(());
                }
                Err(err) => return Err(err),
            };

            if message.is_request() {
                let response = self.handle_request(message).await;
                transport.send(response).await?;
            } else if message.is_notification() {
                debug!(method = message.method.as_deref(), "notification received");
            } else {
                warn!("ignoring unexpected response-shaped message");
            }
        }
    }

    async fn handle_request(&self, request: McpMessage) -> McpMessage {
        let id = request.id.clone();
        let method = request.method.as_deref().unwrap_or_default().to_string();

        let result = match method.as_str() {
            "initialize" => self.handle_initialize(request.params),
            "tools/list" => self.handle_list_tools(),
            "tools/call" => self.handle_tool_call(request.params).await,
            "ping" => Ok(json!({})),
            other => Err(ProtocolError::MethodNotFound(other.to_string()).into()),
        };

        match result {
            Ok(value) => McpMessage::response(id, value),
            Err(err) => {
                debug!(%method, %err, "request failed");
                McpMessage::error_response(id, JsonRpcError::from(err))
            }
        }
    }

    fn handle_initialize(&self, params: Option<Value>) -> McpResult<Value> {
        if let Some(params) = params {
            let init: InitializeParams = serde_json::from_value(params)
                .map_err(|err| ProtocolError::InvalidParams(err.to_string()))?;
            if let Some(client) = &init.client_info {
                info!(client = %client.name, version = %client.version, "client initialized");
            }
        }

        let result = InitializeResult {
            protocol_version: MCP_PROTOCOL_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: ToolsCapability {
                    list_changed: false,
                },
            },
            server_info: ServerInfo {
                name: SERVER_NAME.to_string(),
                version: SERVER_VERSION.to_string(),
            },
            instructions: Some(
                "Persona selection server: analyze tasks, select or synthesize personas, manage the catalogue".to_string(),
            ),
        };
        Ok(serde_json::to_value(result)?)
    }

    fn handle_list_tools(&self) -> McpResult<Value> {
        Ok(json!({ "tools": self.registry.list() }))
    }

    async fn handle_tool_call(&self, params: Option<Value>) -> McpResult<Value> {
        let params = params
            .ok_or_else(|| ProtocolError::InvalidParams("missing tool call parameters".into()))?;
        let name = params
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| ProtocolError::InvalidParams("missing tool name".into()))?;
        let arguments = params.get("arguments").cloned().unwrap_or_else(|| json!({}));

        let result = self.registry.call(name, arguments, &self.context).await?;
        Ok(serde_json::to_value(result)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mcp::tools::registry::default_registry;
    use crate::mcp::tools::test_context;
    use crate::mcp::transport::ChannelTransport;
    use serde_json::json;

    fn server() -> (tempfile::TempDir, McpServer) {
        let (dir, context) = test_context();
        (dir, McpServer::new(default_registry().unwrap(), context))
    }

    #[tokio::test]
    async fn initialize_reports_server_identity() {
        let (_dir, server) = server();
        let response = server
            .handle_request(McpMessage::request(json!(1), "initialize", None))
            .await;
        let result = response.result.unwrap();
        assert_eq!(result["protocolVersion"], MCP_PROTOCOL_VERSION);
        assert_eq!(result["serverInfo"]["name"], SERVER_NAME);
    }

    #[tokio::test]
    async fn tools_list_carries_every_registered_tool() {
        let (_dir, server) = server();
        let response = server
            .handle_request(McpMessage::request(json!(2), "tools/list", None))
            .await;
        let tools = response.result.unwrap()["tools"].as_array().unwrap().len();
        assert_eq!(tools, 15);
    }

    #[tokio::test]
    async fn unknown_method_is_a_method_not_found_error() {
        let (_dir, server) = server();
        let response = server
            .handle_request(McpMessage::request(json!(3), "prompts/list", None))
            .await;
        assert_eq!(response.error.unwrap().code, -32601);
    }

    #[tokio::test]
    async fn tool_call_routes_to_the_named_tool() {
        let (_dir, server) = server();
        let response = server
            .handle_request(McpMessage::request(
                json!(4),
                "tools/call",
                Some(json!({
                    "name": "list_personas",
                    "arguments": {}
                })),
            ))
            .await;
        let result = response.result.unwrap();
        assert_eq!(result["content"][0]["type"], "text");
    }

    #[tokio::test]
    async fn tool_call_without_a_name_is_invalid_params() {
        let (_dir, server) = server();
        let response = server
            .handle_request(McpMessage::request(
                json!(5),
                "tools/call",
                Some(json!({"arguments": {}})),
            ))
            .await;
        assert_eq!(response.error.unwrap().code, -32602);
    }

    #[tokio::test]
    async fn run_loop_answers_requests_until_the_client_disconnects() {
        let (_dir, server) = server();
        let (mut transport, client_tx, mut client_rx) = ChannelTransport::pair();

        client_tx
            .send(McpMessage::request(json!(1), "initialize", None))
            .unwrap();
        client_tx
            .send(McpMessage::request(json!(2), "tools/list", None))
            .unwrap();
        drop(client_tx);

        server.run(&mut transport).await.unwrap();

        let first = client_rx.recv().await.unwrap();
        assert_eq!(first.id, Some(json!(1)));
        assert!(first.result.is_some());

        let second = client_rx.recv().await.unwrap();
        assert_eq!(second.id, Some(json!(2)));
        assert!(second.result.unwrap()["tools"].is_array());
    }
}
