//! Newline-delimited JSON-RPC transport and server loop.
//!
//! Each line on the input is one JSON-RPC message and each response is written
//! as one line. Logging must go to stderr; stdout carries protocol traffic only.

use std::future::Future;
use std::io::ErrorKind;

use anyhow::{Context, Result};
use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::select;

use crate::server::McpServerState;
use crate::types::JsonRpcResponse;
use crate::Error;

/// Configure tracing to write only to stderr.
pub fn configure_tracing(log_level: Option<&str>) -> Result<()> {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = match log_level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };

    let subscriber = fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(env_filter)
        .with_target(false)
        .with_ansi(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    Ok(())
}

/// Line transport over any async reader/writer pair.
pub struct LineTransport<R, W> {
    reader: R,
    writer: W,
}

/// Transport bound to the process stdin/stdout.
pub type StdioTransport = LineTransport<BufReader<tokio::io::Stdin>, tokio::io::Stdout>;

impl StdioTransport {
    pub fn stdio() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
    }
}

impl<R, W> LineTransport<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    /// Read the next non-blank line as raw bytes. Returns Ok(None) on EOF.
    ///
    /// Bytes are not decoded here so that a line with invalid UTF-8 can be
    /// answered like any other malformed message.
    pub async fn read_line(&mut self) -> Result<Option<Vec<u8>>> {
        loop {
            let mut line = Vec::new();
            let bytes = self
                .reader
                .read_until(b'\n', &mut line)
                .await
                .context("failed to read line")?;
            if bytes == 0 {
                return Ok(None);
            }
            if !line.iter().all(u8::is_ascii_whitespace) {
                return Ok(Some(line));
            }
        }
    }

    /// Write one JSON value followed by a newline and flush.
    pub async fn write_message<T: serde::Serialize>(&mut self, msg: &T) -> Result<()> {
        let mut s = serde_json::to_string(msg)?;
        s.push('\n');
        self.writer.write_all(s.as_bytes()).await?;
        self.writer.flush().await?;
        Ok(())
    }

    /// Hand back the writer, e.g. to inspect what a test wrote.
    pub fn into_writer(self) -> W {
        self.writer
    }
}

fn is_broken_pipe(err: &anyhow::Error) -> bool {
    err.downcast_ref::<std::io::Error>()
        .map(|ioe| ioe.kind() == ErrorKind::BrokenPipe)
        .unwrap_or(false)
}

fn parse_error(message: String) -> JsonRpcResponse {
    JsonRpcResponse::error(Value::Null, &Error::parse_error(message))
}

/// Response for one input line, if any.
fn respond_to_line(server: &McpServerState, line: &[u8]) -> Option<JsonRpcResponse> {
    let text = match std::str::from_utf8(line) {
        Ok(text) => text.trim(),
        Err(err) => {
            tracing::warn!(error = %err, "discarding line that is not valid UTF-8");
            return Some(parse_error(format!("invalid UTF-8: {err}")));
        }
    };

    match serde_json::from_str::<Value>(text) {
        Ok(message) => server.handle_value(message),
        Err(err) => {
            tracing::warn!(error = %err, "discarding malformed JSON line");
            Some(parse_error(err.to_string()))
        }
    }
}

/// Run the server loop until EOF, a broken pipe, or `shutdown` resolves.
///
/// Returns the transport so callers can inspect it after the loop ends.
pub async fn run_server_loop<R, W, F>(
    mut transport: LineTransport<R, W>,
    server: &McpServerState,
    shutdown: F,
) -> Result<LineTransport<R, W>>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
    F: Future<Output = ()>,
{
    tracing::info!("MCP server waiting for requests");
    tokio::pin!(shutdown);

    loop {
        let line = select! {
            _ = &mut shutdown => {
                tracing::info!("Received shutdown signal, exiting gracefully");
                break;
            }
            line = transport.read_line() => line?,
        };

        let Some(line) = line else {
            tracing::info!("Client disconnected (EOF)");
            break;
        };

        let Some(response) = respond_to_line(server, &line) else {
            continue;
        };

        if let Err(e) = transport.write_message(&response).await {
            if is_broken_pipe(&e) {
                tracing::info!("Client disconnected (broken pipe)");
                break;
            }
            return Err(e);
        }
    }

    tracing::info!("Shutdown complete");
    Ok(transport)
}

/// Serve JSON-RPC on stdin/stdout until EOF or Ctrl-C.
pub async fn serve_stdio(server: McpServerState) -> Result<()> {
    let shutdown = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %err, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };
    run_server_loop(StdioTransport::stdio(), &server, shutdown).await?;
    Ok(())
}
