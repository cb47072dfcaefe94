use anyhow::{Context, Result};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tokio::net::TcpListener;

use super::McpServer;

/// Build the HTTP routes: `POST /mcp` for JSON-RPC, `GET /health` for liveness checks
pub fn router(server: McpServer) -> Router {
    Router::new()
        .route("/mcp", post(handle_rpc))
        .route("/health", get(health))
        .with_state(server)
}

/// Serve JSON-RPC over HTTP until the process is stopped
pub async fn run(server: McpServer, host: &str, port: u16) -> Result<()> {
    let address = format!("{}:{}", host, port);
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;

    tracing::info!("Listening on http://{}/mcp", address);
    serve_listener(server, listener).await
}

/// Serve JSON-RPC over HTTP on an already bound listener
pub async fn serve_listener(server: McpServer, listener: TcpListener) -> Result<()> {
    axum::serve(listener, router(server))
        .await
        .context("HTTP server failed")?;

    Ok(())
}

async fn handle_rpc(State(server): State<McpServer>, body: String) -> Response {
    match server.handle_message(&body).await {
        Some(response) => Json(response).into_response(),
        None => StatusCode::ACCEPTED.into_response(),
    }
}

async fn health() -> &'static str {
    "ok"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TranscriptDefaults;
    use crate::pipeline::TranscriptPipeline;
    use crate::source::MockTranscriptSource;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use std::time::Duration;

    async fn spawn_server() -> String {
        let pipeline = TranscriptPipeline::new(
            Arc::new(MockTranscriptSource::new()),
            TranscriptDefaults::default(),
        );
        let server = McpServer::new(Arc::new(pipeline), Duration::from_secs(5));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        tokio::spawn(serve_listener(server, listener));

        format!("http://{}", address)
    }

    #[tokio::test]
    async fn test_rpc_over_http() {
        let base = spawn_server().await;
        let client = reqwest::Client::new();

        let response: Value = client
            .post(format!("{}/mcp", base))
            .json(&json!({"jsonrpc": "2.0", "id": 1, "method": "tools/list"}))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(response["result"]["tools"].as_array().unwrap().len(), 3);

        let status = client
            .post(format!("{}/mcp", base))
            .json(&json!({"jsonrpc": "2.0", "method": "notifications/initialized"}))
            .send()
            .await
            .unwrap()
            .status();
        assert_eq!(status, reqwest::StatusCode::ACCEPTED);
    }

    #[tokio::test]
    async fn test_health() {
        let base = spawn_server().await;
        let body = reqwest::get(format!("{}/health", base))
            .await
            .unwrap()
            .text()
            .await
            .unwrap();
        assert_eq!(body, "ok");
    }
}
