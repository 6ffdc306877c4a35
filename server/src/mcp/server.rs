//! MCP Server Implementation
//!
//! Handles MCP protocol requests and routes tool calls to the API index.

use super::protocol::*;
use super::tools::get_all_tools;
use super::transport::AsyncStdioTransport;
use crate::cli::ReloadPolicy;
use crate::error::ToolResult;
use crate::operations::ApiOperation;
use apidoc_index::ApiIndex;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncWrite};

const PROTOCOL_VERSION: &str = "2024-11-05";
const SERVER_NAME: &str = "apidoc-mcp";
const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// MCP Server - handles protocol messages
pub struct McpServer {
    index: Arc<ApiIndex>,
    source: String,
    reload: ReloadPolicy,
    initialized: bool,
}

impl McpServer {
    pub fn new(index: Arc<ApiIndex>, source: impl Into<String>, reload: ReloadPolicy) -> Self {
        Self {
            index,
            source: source.into(),
            reload,
            initialized: false,
        }
    }

    /// Run the MCP server event loop on stdio
    pub async fn run(&mut self) -> std::io::Result<()> {
        self.serve(AsyncStdioTransport::stdio()).await.map(|_| ())
    }

    /// Serve requests until the peer closes the stream. Returns the transport
    /// so callers can inspect what was written.
    pub async fn serve<R, W>(
        &mut self,
        mut transport: AsyncStdioTransport<R, W>,
    ) -> std::io::Result<AsyncStdioTransport<R, W>>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        tracing::info!("MCP server starting (reload policy: {:?})", self.reload);

        loop {
            match transport.read_request().await {
                Ok(Some(request)) => {
                    if let Some(response) = self.handle_request(request).await {
                        transport.write_response(&response).await?;
                    }
                }
                Ok(None) => {
                    tracing::info!("Client disconnected");
                    break;
                }
                Err(e) if e.kind() == std::io::ErrorKind::InvalidData => {
                    let response = JsonRpcResponse::error(
                        None,
                        JsonRpcError::parse_error(format!("Parse error: {}", e)),
                    );
                    transport.write_response(&response).await?;
                }
                Err(e) => return Err(e),
            }
        }

        Ok(transport)
    }

    /// Handle a JSON-RPC request. Notifications produce no response.
    async fn handle_request(&mut self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        tracing::debug!("Handling request: {}", request.method);

        if request.is_notification() {
            tracing::debug!("Notification {} acknowledged", request.method);
            return None;
        }

        if request.jsonrpc != "2.0" {
            return Some(JsonRpcResponse::error(
                request.id,
                JsonRpcError::invalid_request(format!(
                    "Unsupported jsonrpc version: {}",
                    request.jsonrpc
                )),
            ));
        }

        let response = match request.method.as_str() {
            "initialize" => self.handle_initialize(request.id, request.params),
            "ping" => respond(request.id, &PingResult {}),
            "tools/list" => respond(
                request.id,
                &ToolsListResult {
                    tools: get_all_tools(),
                },
            ),
            "tools/call" => self.handle_tools_call(request.id, request.params).await,
            _ => {
                JsonRpcResponse::error(request.id, JsonRpcError::method_not_found(&request.method))
            }
        };

        Some(response)
    }

    fn handle_initialize(&mut self, id: Option<Value>, params: Option<Value>) -> JsonRpcResponse {
        let params: InitializeParams = match params.map(serde_json::from_value) {
            Some(Ok(params)) => params,
            Some(Err(e)) => {
                tracing::warn!("Ignoring malformed initialize params: {}", e);
                InitializeParams::default()
            }
            None => InitializeParams::default(),
        };

        if let Some(client) = &params.client_info {
            tracing::info!(
                "Client connected: {} {} (protocol {})",
                client.name,
                client.version.as_deref().unwrap_or("?"),
                params.protocol_version.as_deref().unwrap_or("unspecified")
            );
        }

        self.initialized = true;

        let result = InitializeResult {
            protocol_version: PROTOCOL_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability {
                    list_changed: Some(false),
                }),
            },
            server_info: ServerInfo {
                name: SERVER_NAME.to_string(),
                version: Some(SERVER_VERSION.to_string()),
            },
        };

        respond(id, &result)
    }

    async fn handle_tools_call(&self, id: Option<Value>, params: Option<Value>) -> JsonRpcResponse {
        let params: ToolCallParams = match params {
            Some(p) => match serde_json::from_value(p) {
                Ok(p) => p,
                Err(e) => {
                    return JsonRpcResponse::error(
                        id,
                        JsonRpcError::invalid_params(format!("Invalid params: {}", e)),
                    );
                }
            },
            None => {
                return JsonRpcResponse::error(id, JsonRpcError::invalid_params("Missing params"));
            }
        };

        if !self.initialized {
            tracing::warn!("tools/call before initialize: {}", params.name);
        }

        match self.execute_tool(&params.name, params.arguments).await {
            Ok(result) => {
                let text =
                    serde_json::to_string_pretty(&result).unwrap_or_else(|_| result.to_string());
                respond(id, &ToolCallResult::text(text))
            }
            Err(e) if e.is_protocol_error() => JsonRpcResponse::error(id, e.into()),
            Err(e) => {
                tracing::warn!("Tool {} failed: {}", params.name, e);
                respond(id, &ToolCallResult::error(format!("Error: {}", e)))
            }
        }
    }

    /// Execute a tool by name, reloading the document first when the policy
    /// asks for it.
    async fn execute_tool(&self, name: &str, args: Option<Value>) -> ToolResult<Value> {
        let args = args.unwrap_or(Value::Object(serde_json::Map::new()));
        let operation = ApiOperation::from_tool_call(name, &args)?;

        if self.reload == ReloadPolicy::PerCall {
            self.index.load(&self.source).await?;
        }

        operation.execute(&self.index)
    }
}

fn respond<T: Serialize>(id: Option<Value>, result: &T) -> JsonRpcResponse {
    match serde_json::to_value(result) {
        Ok(value) => JsonRpcResponse::success(id, value),
        Err(e) => JsonRpcResponse::error(id, JsonRpcError::internal_error(e.to_string())),
    }
}
