use anyhow::Result;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

pub mod http;
pub mod protocol;
pub mod stdio;

use crate::config::{Config, Transport};
use crate::output::render_language_listing;
use crate::pipeline::TranscriptPipeline;
use crate::TranscriptError;
use protocol::*;

/// Server name reported to MCP clients
pub const SERVER_NAME: &str = "youtube-transcript";

/// MCP request handler shared by all transports
#[derive(Clone)]
pub struct McpServer {
    pipeline: Arc<TranscriptPipeline>,
    request_timeout: Duration,
}

impl McpServer {
    pub fn new(pipeline: Arc<TranscriptPipeline>, request_timeout: Duration) -> Self {
        Self {
            pipeline,
            request_timeout,
        }
    }

    /// Handle one raw JSON-RPC message. Returns `None` for notifications.
    pub async fn handle_message(&self, raw: &str) -> Option<JsonRpcResponse> {
        let value: Value = match serde_json::from_str(raw) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Discarding unparsable message: {}", e);
                return Some(JsonRpcResponse::failure(
                    Value::Null,
                    JsonRpcError::new(PARSE_ERROR, format!("Parse error: {}", e)),
                ));
            }
        };

        let id = value.get("id").cloned().unwrap_or(Value::Null);
        match serde_json::from_value::<JsonRpcRequest>(value) {
            Ok(request) => self.handle_request(request).await,
            Err(e) => Some(JsonRpcResponse::failure(
                id,
                JsonRpcError::new(INVALID_REQUEST, format!("Invalid request: {}", e)),
            )),
        }
    }

    /// Handle a decoded JSON-RPC request or notification
    pub async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        if request.jsonrpc != JSONRPC_VERSION {
            return Some(JsonRpcResponse::failure(
                request.id.unwrap_or(Value::Null),
                JsonRpcError::new(INVALID_REQUEST, "Unsupported JSON-RPC version"),
            ));
        }

        if request.is_notification() {
            tracing::debug!("Received notification: {}", request.method);
            return None;
        }

        let id = request.id.unwrap_or(Value::Null);
        let response = match self.dispatch(&request.method, request.params).await {
            Ok(result) => JsonRpcResponse::success(id, result),
            Err(error) => JsonRpcResponse::failure(id, error),
        };

        Some(response)
    }

    async fn dispatch(&self, method: &str, params: Option<Value>) -> Result<Value, JsonRpcError> {
        match method {
            "initialize" => Ok(self.initialize(params.as_ref())),
            "ping" => Ok(json!({})),
            "tools/list" => Ok(json!({ "tools": tool_definitions() })),
            "tools/call" => self.call_tool(decode_params(params)?).await,
            "resources/list" => Ok(json!({ "resources": [] })),
            "resources/templates/list" => Ok(json!({ "resourceTemplates": resource_templates() })),
            "resources/read" => self.read_resource(decode_params(params)?).await,
            other => Err(JsonRpcError::new(
                METHOD_NOT_FOUND,
                format!("Method not found: {}", other),
            )),
        }
    }

    fn initialize(&self, params: Option<&Value>) -> Value {
        let protocol_version = params
            .and_then(|p| p.get("protocolVersion"))
            .and_then(Value::as_str)
            .unwrap_or(PROTOCOL_VERSION);

        json!({
            "protocolVersion": protocol_version,
            "capabilities": {
                "tools": { "listChanged": false },
                "resources": { "subscribe": false, "listChanged": false }
            },
            "serverInfo": {
                "name": SERVER_NAME,
                "version": env!("CARGO_PKG_VERSION")
            }
        })
    }

    async fn call_tool(&self, params: ToolCallParams) -> Result<Value, JsonRpcError> {
        let arguments = params.arguments.unwrap_or_else(|| json!({}));
        tracing::info!("Tool call: {}", params.name);

        let outcome = match params.name.as_str() {
            TOOL_TRANSCRIPT_FROM_URL => {
                let args: TranscriptFromUrlArgs = decode_params(Some(arguments))?;
                self.with_timeout(self.pipeline.get_transcript_from_url(
                    &args.url,
                    args.language.as_deref(),
                    args.format_type.as_deref(),
                ))
                .await
                .map(|result| result.render())
            }
            TOOL_TRANSCRIPT_FROM_ID => {
                let args: TranscriptFromIdArgs = decode_params(Some(arguments))?;
                self.with_timeout(self.pipeline.get_transcript_from_id(
                    &args.video_id,
                    args.language.as_deref(),
                    args.format_type.as_deref(),
                ))
                .await
                .map(|result| result.render())
            }
            TOOL_LIST_TRANSCRIPTS => {
                let args: ListTranscriptsArgs = decode_params(Some(arguments))?;
                self.with_timeout(self.pipeline.list_available_transcripts(&args.video_url_or_id))
                    .await
                    .map(|listing| render_language_listing(&listing))
            }
            other => {
                return Err(JsonRpcError::new(
                    INVALID_PARAMS,
                    format!("Unknown tool: {}", other),
                ))
            }
        };

        Ok(match outcome {
            Ok(text) => tool_result(text, false),
            Err(e) => {
                tracing::warn!("Tool {} failed: {}", params.name, e.caller_message());
                tool_result(e.caller_message(), true)
            }
        })
    }

    async fn read_resource(&self, params: ReadResourceParams) -> Result<Value, JsonRpcError> {
        let video_id = params.uri.strip_prefix(RESOURCE_URI_PREFIX).ok_or_else(|| {
            JsonRpcError::new(INVALID_PARAMS, format!("Unknown resource: {}", params.uri))
        })?;
        tracing::info!("Resource request for video: {}", video_id);

        let text = match self
            .with_timeout(self.pipeline.get_transcript_from_id(video_id, None, None))
            .await
        {
            Ok(result) => result.render(),
            Err(e) => e.caller_message(),
        };

        Ok(json!({
            "contents": [{
                "uri": params.uri,
                "mimeType": "text/plain",
                "text": text
            }]
        }))
    }

    /// Bound a pipeline call by the configured timeout
    async fn with_timeout<T>(
        &self,
        call: impl Future<Output = Result<T, TranscriptError>>,
    ) -> Result<T, TranscriptError> {
        match tokio::time::timeout(self.request_timeout, call).await {
            Ok(outcome) => outcome,
            Err(_) => Err(TranscriptError::Unknown(format!(
                "Request timed out after {}s",
                self.request_timeout.as_secs()
            ))),
        }
    }
}

fn decode_params<T: DeserializeOwned>(params: Option<Value>) -> Result<T, JsonRpcError> {
    serde_json::from_value(params.unwrap_or(Value::Null))
        .map_err(|e| JsonRpcError::new(INVALID_PARAMS, format!("Invalid params: {}", e)))
}

/// Run the MCP server on the configured transport
pub async fn serve(config: &Config, pipeline: Arc<TranscriptPipeline>) -> Result<()> {
    let server = McpServer::new(
        pipeline,
        Duration::from_secs(config.server.request_timeout_secs),
    );

    tracing::info!(
        "Starting YouTube Transcript MCP server with {} transport",
        config.server.transport
    );

    match config.server.transport {
        Transport::Stdio => stdio::run(server).await,
        Transport::Http => http::run(server, &config.server.host, config.server.port).await,
    }
}
