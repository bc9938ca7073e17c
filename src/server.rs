//! MCP server implementation.

use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use tokio::sync::RwLock;

use crate::error::{codes, Error, Result};
use crate::prompts;
use crate::protocol::{
    GetPromptParams, InitializeParams, InitializeResult, JsonRpcId, JsonRpcRequest,
    JsonRpcResponse, ListChanged, ListPromptsResult, ListResourcesResult, ListToolsResult,
    McpMessage, ReadResourceParams, ResourcesCapability, ServerCapabilities, ServerInfo,
    ToolCallParams,
};
use crate::tools::{ToolContext, ToolRegistry, Toolset};

/// MCP protocol version.
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// Binary name.
pub const SERVER_NAME: &str = "scaffold-mcp";

/// Server version.
pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// MCP server state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerState {
    /// Waiting for initialization.
    Uninitialized,
    /// Server is initialized and ready.
    Ready,
    /// Server is shutting down.
    ShuttingDown,
}

/// MCP server exposing one [`Toolset`].
pub struct McpServer {
    state: Arc<RwLock<ServerState>>,
    toolset: Toolset,
    tools: Arc<ToolRegistry>,
    project_root: PathBuf,
}

impl McpServer {
    /// Create a server for `toolset`; `project_root` backs tools whose root
    /// argument is optional and the project summary resource.
    pub fn new(toolset: Toolset, project_root: impl Into<PathBuf>) -> Self {
        let project_root = project_root.into();
        Self {
            state: Arc::new(RwLock::new(ServerState::Uninitialized)),
            toolset,
            tools: Arc::new(ToolRegistry::new(
                toolset,
                ToolContext::new(project_root.clone()),
            )),
            project_root,
        }
    }

    /// The toolset this server exposes.
    pub fn toolset(&self) -> Toolset {
        self.toolset
    }

    /// Run the server on stdio.
    pub async fn run_stdio(&self) -> Result<()> {
        let stdin = std::io::stdin();
        let mut stdout = std::io::stdout();
        let reader = BufReader::new(stdin.lock());

        tracing::info!(
            "MCP server '{}' starting on stdio",
            self.toolset.server_name()
        );

        for line in reader.lines() {
            let line = line?;

            if line.trim().is_empty() {
                continue;
            }

            tracing::debug!("Received: {}", line);

            if let Some(response) = self.handle_message(&line).await {
                let json = serde_json::to_string(&response)?;
                tracing::debug!("Sending: {}", json);
                writeln!(stdout, "{}", json)?;
                stdout.flush()?;
            }

            if *self.state.read().await == ServerState::ShuttingDown {
                break;
            }
        }

        tracing::info!("MCP server shutting down");
        Ok(())
    }

    /// Handle an incoming message.
    pub async fn handle_message(&self, json: &str) -> Option<JsonRpcResponse> {
        match McpMessage::parse(json) {
            Ok(McpMessage::Request(request)) => Some(self.handle_request(request).await),
            Ok(McpMessage::Notification(notification)) => {
                self.handle_notification(notification).await;
                None
            }
            // Clients do not answer us; nothing we sent expects a reply.
            Ok(McpMessage::Response(_)) => None,
            Err(e) => Some(JsonRpcResponse::error(
                None,
                codes::PARSE_ERROR,
                e.to_string(),
            )),
        }
    }

    async fn handle_request(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        let id = request.id.clone();

        match request.method.as_str() {
            "initialize" => self.handle_initialize(id, request.params).await,
            "ping" => JsonRpcResponse::success(id, serde_json::json!({})),
            "shutdown" => {
                *self.state.write().await = ServerState::ShuttingDown;
                JsonRpcResponse::success(id, serde_json::json!({}))
            }
            "tools/list" | "tools/call" | "prompts/list" | "prompts/get" | "resources/list"
            | "resources/read" => {
                if *self.state.read().await != ServerState::Ready {
                    return JsonRpcResponse::error(
                        id,
                        codes::INTERNAL_ERROR,
                        "server not initialized",
                    );
                }
                match self.handle_ready_request(&request.method, request.params).await {
                    Ok(result) => JsonRpcResponse::success(id, result),
                    Err(e) => {
                        tracing::error!("{} failed: {}", request.method, e);
                        JsonRpcResponse::from_error(id, &e)
                    }
                }
            }
            _ => JsonRpcResponse::error(
                id,
                codes::METHOD_NOT_FOUND,
                format!("method not found: {}", request.method),
            ),
        }
    }

    async fn handle_ready_request(
        &self,
        method: &str,
        params: Option<serde_json::Value>,
    ) -> Result<serde_json::Value> {
        let has_prompts = self.toolset == Toolset::Tests;

        let result = match method {
            "tools/list" => serde_json::to_value(ListToolsResult {
                tools: self.tools.list_tools(),
            })?,
            "tools/call" => {
                let params: ToolCallParams = required_params(params, "tool call")?;
                serde_json::to_value(self.tools.execute(&params.name, params.arguments).await?)?
            }
            "prompts/list" => serde_json::to_value(ListPromptsResult {
                prompts: if has_prompts {
                    prompts::list_prompts()
                } else {
                    Vec::new()
                },
            })?,
            "prompts/get" if has_prompts => {
                let params: GetPromptParams = required_params(params, "prompt")?;
                serde_json::to_value(prompts::get_prompt(&params.name, &params.arguments)?)?
            }
            "resources/list" => serde_json::to_value(ListResourcesResult {
                resources: if has_prompts {
                    prompts::list_resources()
                } else {
                    Vec::new()
                },
            })?,
            "resources/read" if has_prompts => {
                let params: ReadResourceParams = required_params(params, "resource")?;
                serde_json::to_value(prompts::read_resource(&params.uri, &self.project_root)?)?
            }
            "prompts/get" => {
                return Err(Error::InvalidParams("this server offers no prompts".into()))
            }
            "resources/read" => {
                return Err(Error::InvalidParams("this server offers no resources".into()))
            }
            other => {
                return Err(Error::JsonRpc {
                    code: codes::METHOD_NOT_FOUND,
                    message: format!("method not found: {}", other),
                })
            }
        };
        Ok(result)
    }

    async fn handle_notification(&self, notification: JsonRpcRequest) {
        match notification.method.as_str() {
            "notifications/initialized" => {
                tracing::info!("Client initialized");
            }
            "notifications/cancelled" => {
                tracing::debug!("Request cancelled by client");
            }
            "exit" => {
                *self.state.write().await = ServerState::ShuttingDown;
            }
            _ => {
                tracing::debug!("Unknown notification: {}", notification.method);
            }
        }
    }

    async fn handle_initialize(
        &self,
        id: Option<JsonRpcId>,
        params: Option<serde_json::Value>,
    ) -> JsonRpcResponse {
        let params: InitializeParams = match required_params(params, "initialize") {
            Ok(params) => params,
            Err(e) => return JsonRpcResponse::from_error(id, &e),
        };
        tracing::info!(
            "Initializing for {} {} (protocol {})",
            params.client_info.name,
            params.client_info.version,
            params.protocol_version
        );

        *self.state.write().await = ServerState::Ready;

        let has_prompts = self.toolset == Toolset::Tests;
        let result = InitializeResult {
            protocol_version: PROTOCOL_VERSION.into(),
            capabilities: ServerCapabilities {
                tools: Some(ListChanged::default()),
                resources: has_prompts.then(ResourcesCapability::default),
                prompts: has_prompts.then(ListChanged::default),
            },
            server_info: ServerInfo {
                name: self.toolset.server_name().into(),
                version: SERVER_VERSION.into(),
            },
        };

        JsonRpcResponse::success(id, result)
    }
}

fn required_params<T: DeserializeOwned>(params: Option<serde_json::Value>, what: &str) -> Result<T> {
    let params = params.ok_or_else(|| Error::InvalidParams(format!("{} params required", what)))?;
    serde_json::from_value(params)
        .map_err(|e| Error::InvalidParams(format!("invalid {} params: {}", what, e)))
}
