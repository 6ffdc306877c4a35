//! MCP Transport Layer
//!
//! Line-delimited JSON-RPC 2.0 over an async reader/writer pair, stdio by
//! default.

use super::protocol::{JsonRpcRequest, JsonRpcResponse};
use std::io;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

/// Async line transport for MCP
pub struct AsyncStdioTransport<R, W> {
    reader: R,
    writer: W,
}

impl AsyncStdioTransport<BufReader<tokio::io::Stdin>, tokio::io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
    }
}

impl<R, W> AsyncStdioTransport<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    /// Read the next JSON-RPC request.
    ///
    /// Blank lines are skipped. `Ok(None)` means the peer closed the stream;
    /// a line that is not a request yields `ErrorKind::InvalidData`.
    pub async fn read_request(&mut self) -> io::Result<Option<JsonRpcRequest>> {
        loop {
            let mut line = String::new();
            let bytes_read = self.reader.read_line(&mut line).await?;

            if bytes_read == 0 {
                return Ok(None);
            }

            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            return match serde_json::from_str(line) {
                Ok(request) => Ok(Some(request)),
                Err(e) => {
                    tracing::error!("Failed to parse JSON-RPC request: {}", e);
                    Err(io::Error::new(io::ErrorKind::InvalidData, e))
                }
            };
        }
    }

    /// Write a JSON-RPC response as one line
    pub async fn write_response(&mut self, response: &JsonRpcResponse) -> io::Result<()> {
        let json = serde_json::to_string(response)?;
        self.writer.write_all(json.as_bytes()).await?;
        self.writer.write_all(b"\n").await?;
        self.writer.flush().await
    }

    pub fn into_writer(self) -> W {
        self.writer
    }
}
