use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

pub const JSONRPC_VERSION: &str = "2.0";

/// Protocol revision offered when the client does not ask for one
pub const PROTOCOL_VERSION: &str = "2024-11-05";

pub const PARSE_ERROR: i64 = -32700;
pub const INVALID_REQUEST: i64 = -32600;
pub const METHOD_NOT_FOUND: i64 = -32601;
pub const INVALID_PARAMS: i64 = -32602;

/// Incoming JSON-RPC message. Requests carry an `id`, notifications don't.
#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    #[serde(default)]
    pub id: Option<Value>,
    pub method: String,
    #[serde(default)]
    pub params: Option<Value>,
}

impl JsonRpcRequest {
    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i64,
    pub message: String,
}

impl JsonRpcError {
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    pub id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

impl JsonRpcResponse {
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn failure(id: Value, error: JsonRpcError) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: None,
            error: Some(error),
        }
    }
}

/// Arguments of `get_transcript_from_url`
#[derive(Debug, Clone, Deserialize)]
pub struct TranscriptFromUrlArgs {
    pub url: String,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub format_type: Option<String>,
}

/// Arguments of `get_transcript_from_id`
#[derive(Debug, Clone, Deserialize)]
pub struct TranscriptFromIdArgs {
    pub video_id: String,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub format_type: Option<String>,
}

/// Arguments of `list_available_transcripts`
#[derive(Debug, Clone, Deserialize)]
pub struct ListTranscriptsArgs {
    pub video_url_or_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ToolCallParams {
    pub name: String,
    #[serde(default)]
    pub arguments: Option<Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReadResourceParams {
    pub uri: String,
}

pub const TOOL_TRANSCRIPT_FROM_URL: &str = "get_transcript_from_url";
pub const TOOL_TRANSCRIPT_FROM_ID: &str = "get_transcript_from_id";
pub const TOOL_LIST_TRANSCRIPTS: &str = "list_available_transcripts";

pub const RESOURCE_URI_PREFIX: &str = "youtube://transcript/";
pub const RESOURCE_URI_TEMPLATE: &str = "youtube://transcript/{video_id}";

fn language_schema() -> Value {
    json!({
        "type": "string",
        "description": "Preferred transcript language code (e.g. \"en\", \"es\"). Falls back to English, then to the first available language"
    })
}

fn format_schema() -> Value {
    json!({
        "type": "string",
        "enum": ["text", "json", "raw"],
        "description": "Output format: \"text\" ([MM:SS] lines), \"json\" (structured segments) or \"raw\" (unprocessed source payload)",
        "default": "text"
    })
}

/// Tool descriptors advertised by `tools/list`
pub fn tool_definitions() -> Value {
    json!([
        {
            "name": TOOL_TRANSCRIPT_FROM_URL,
            "description": "Extract the transcript of a YouTube video from its URL",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "url": {
                        "type": "string",
                        "description": "YouTube video URL (watch, youtu.be, embed or /v/ links)"
                    },
                    "language": language_schema(),
                    "format_type": format_schema()
                },
                "required": ["url"]
            }
        },
        {
            "name": TOOL_TRANSCRIPT_FROM_ID,
            "description": "Extract the transcript of a YouTube video from its 11-character video ID",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "video_id": {
                        "type": "string",
                        "description": "YouTube video ID (11 characters)"
                    },
                    "language": language_schema(),
                    "format_type": format_schema()
                },
                "required": ["video_id"]
            }
        },
        {
            "name": TOOL_LIST_TRANSCRIPTS,
            "description": "List all transcript languages available for a YouTube video",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "video_url_or_id": {
                        "type": "string",
                        "description": "YouTube video URL or video ID"
                    }
                },
                "required": ["video_url_or_id"]
            }
        }
    ])
}

/// Resource templates advertised by `resources/templates/list`
pub fn resource_templates() -> Value {
    json!([
        {
            "uriTemplate": RESOURCE_URI_TEMPLATE,
            "name": "YouTube transcript",
            "description": "Transcript of a YouTube video in the default language and format",
            "mimeType": "text/plain"
        }
    ])
}

/// Build a `tools/call` result
pub fn tool_result(text: String, is_error: bool) -> Value {
    json!({
        "content": [{ "type": "text", "text": text }],
        "isError": is_error
    })
}
