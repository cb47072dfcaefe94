use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinSet;

use serde_json::Value;

use super::protocol::{JsonRpcError, JsonRpcResponse, PARSE_ERROR};
use super::McpServer;

/// Serve newline-delimited JSON-RPC on the process's stdin and stdout
pub async fn run(server: McpServer) -> Result<()> {
    serve_stream(server, tokio::io::stdin(), tokio::io::stdout()).await
}

/// Serve JSON-RPC messages read line by line from `reader`.
///
/// Each request runs on its own task; responses are written by a single
/// writer in completion order and flushed one by one. A line that is not
/// valid UTF-8 is answered with a parse error and the stream keeps going.
/// Returns once the input is exhausted and every in-flight request has been
/// answered.
pub async fn serve_stream<R, W>(server: McpServer, reader: R, writer: W) -> Result<()>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();

    let writer_task = tokio::spawn(async move {
        let mut writer = writer;
        while let Some(message) = rx.recv().await {
            writer.write_all(message.as_bytes()).await?;
            writer.write_all(b"\n").await?;
            writer.flush().await?;
        }
        Ok::<(), std::io::Error>(())
    });

    let mut in_flight = JoinSet::new();
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();

    loop {
        buf.clear();
        let read = reader
            .read_until(b'\n', &mut buf)
            .await
            .context("Failed to read from stdin")?;
        if read == 0 {
            break;
        }

        reap_finished(&mut in_flight);

        let line = match String::from_utf8(trim_line_ending(&buf).to_vec()) {
            Ok(line) => line,
            Err(e) => {
                tracing::warn!("Discarding message that is not valid UTF-8: {}", e);
                let response = JsonRpcResponse::failure(
                    Value::Null,
                    JsonRpcError::new(PARSE_ERROR, format!("Parse error: {}", e)),
                );
                send(&tx, &response);
                continue;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let server = server.clone();
        let tx = tx.clone();
        in_flight.spawn(async move {
            if let Some(response) = server.handle_message(&line).await {
                send(&tx, &response);
            }
        });
    }

    tracing::info!("Input closed, waiting for {} pending requests", in_flight.len());
    while let Some(joined) = in_flight.join_next().await {
        if let Err(e) = joined {
            tracing::error!("Request task failed: {}", e);
        }
    }

    drop(tx);
    writer_task
        .await
        .context("Writer task panicked")?
        .context("Failed to write to stdout")?;

    Ok(())
}

/// Drop tasks that already completed so the set only holds pending requests
fn reap_finished(in_flight: &mut JoinSet<()>) {
    while let Some(joined) = in_flight.try_join_next() {
        if let Err(e) = joined {
            tracing::error!("Request task failed: {}", e);
        }
    }
}

fn trim_line_ending(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

fn send(tx: &mpsc::UnboundedSender<String>, response: &JsonRpcResponse) {
    match serde_json::to_string(response) {
        Ok(encoded) => {
            // The receiver only goes away if the writer failed
            let _ = tx.send(encoded);
        }
        Err(e) => tracing::error!("Failed to encode response: {}", e),
    }
}
