//! DAP client and the session seam the bridge depends on.

use serde_json::Value;
use tokio::io::{AsyncRead, AsyncWrite, BufReader};
use tokio::net::TcpStream;

use crate::transport::framing;
use crate::types::{CaptureError, CaptureResult, DapMessage, RequestMessage};

/// One request/response round trip against a paused debug target.
///
/// The bridge takes this by parameter; looking up the *active* session is the
/// caller's job, and its absence is `NoActiveSession` at that boundary.
#[allow(async_fn_in_trait)]
pub trait DebugSession {
    async fn request(&mut self, command: &str, arguments: Option<Value>) -> CaptureResult<Value>;
}

/// A DAP client over any byte-stream pair.
pub struct DapClient<R, W> {
    reader: BufReader<R>,
    writer: W,
    next_seq: u64,
}

impl DapClient<tokio::net::tcp::OwnedReadHalf, tokio::net::tcp::OwnedWriteHalf> {
    /// Dial a debug adapter listening on a TCP endpoint. A refused or
    /// unreachable endpoint means there is nothing to capture from.
    pub async fn connect(addr: &str) -> CaptureResult<Self> {
        let stream = TcpStream::connect(addr).await.map_err(|e| {
            tracing::warn!("debug adapter unreachable at {addr}: {e}");
            CaptureError::NoActiveSession
        })?;
        let (read_half, write_half) = stream.into_split();
        Ok(Self::new(read_half, write_half))
    }
}

impl<R: AsyncRead + Unpin, W: AsyncWrite + Unpin> DapClient<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader: BufReader::new(reader),
            writer,
            next_seq: 0,
        }
    }
}

impl<R: AsyncRead + Unpin, W: AsyncWrite + Unpin> DebugSession for DapClient<R, W> {
    /// Send one request and wait for its response, skipping any events the
    /// adapter interleaves.
    async fn request(&mut self, command: &str, arguments: Option<Value>) -> CaptureResult<Value> {
        self.next_seq += 1;
        let seq = self.next_seq;
        let msg = DapMessage::Request(RequestMessage {
            seq,
            command: command.to_string(),
            arguments,
        });
        framing::write_message(&mut self.writer, &msg).await?;

        loop {
            match framing::read_message(&mut self.reader).await? {
                DapMessage::Response(resp) if resp.request_seq == seq => {
                    if resp.success {
                        return Ok(resp.body.unwrap_or(Value::Null));
                    }
                    return Err(CaptureError::RequestFailed {
                        command: resp.command,
                        message: resp
                            .message
                            .unwrap_or_else(|| "request failed".to_string()),
                    });
                }
                DapMessage::Event(event) => {
                    tracing::debug!("skipping adapter event: {}", event.event);
                }
                DapMessage::Response(resp) => {
                    tracing::warn!(
                        "dropping stale response for request_seq {}",
                        resp.request_seq
                    );
                }
                DapMessage::Request(req) => {
                    tracing::warn!("ignoring reverse request: {}", req.command);
                }
            }
        }
    }
}
