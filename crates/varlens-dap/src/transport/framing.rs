//! Content-Length framing for DAP messages.
//!
//! Each message is a `Content-Length: N` header block, a blank line, then N
//! bytes of JSON.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::types::{CaptureError, CaptureResult, DapMessage};

/// Serialize and frame a message onto the writer.
pub async fn write_message<W: AsyncWrite + Unpin>(
    writer: &mut W,
    message: &DapMessage,
) -> CaptureResult<()> {
    let body = serde_json::to_vec(message)?;
    let header = format!("Content-Length: {}\r\n\r\n", body.len());
    writer.write_all(header.as_bytes()).await?;
    writer.write_all(&body).await?;
    writer.flush().await?;
    Ok(())
}

/// Read one framed message off the reader.
pub async fn read_message<R: AsyncBufRead + Unpin>(reader: &mut R) -> CaptureResult<DapMessage> {
    let mut content_length: Option<usize> = None;
    loop {
        let mut line = String::new();
        let n = reader.read_line(&mut line).await?;
        if n == 0 {
            return Err(CaptureError::Transport(
                "connection closed by debug adapter".to_string(),
            ));
        }
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            if name.eq_ignore_ascii_case("content-length") {
                content_length = Some(value.trim().parse().map_err(|_| {
                    CaptureError::Transport(format!("bad Content-Length: {value}"))
                })?);
            }
        }
    }

    let len = content_length
        .ok_or_else(|| CaptureError::Transport("missing Content-Length header".to_string()))?;
    let mut body = vec![0u8; len];
    reader.read_exact(&mut body).await?;
    serde_json::from_slice(&body)
        .map_err(|e| CaptureError::Protocol(format!("malformed message: {e}")))
}
