//! Capture orchestration and the sink-facing payload.
//!
//! Both paths — live variable and image file — converge on one payload
//! convention: base64-encoded element bytes plus tensor metadata.

use std::io::Write;
use std::path::Path;

use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use varlens::{Tensor, TensorMeta};

use crate::bridge::{capture_variable, CaptureConfig};
use crate::protocol::DebugSession;
use crate::types::CaptureResult;

/// What a renderer receives: a display name, the encoded element bytes, and
/// the metadata needed to interpret them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisualizationPayload {
    pub name: String,
    /// Base64-encoded raw element bytes, row-major.
    pub data: String,
    pub meta: TensorMeta,
    pub captured_at: DateTime<Utc>,
}

impl VisualizationPayload {
    pub fn from_tensor(name: impl Into<String>, tensor: &Tensor) -> Self {
        Self {
            name: name.into(),
            data: base64::engine::general_purpose::STANDARD.encode(tensor.data()),
            meta: tensor.meta(),
            captured_at: Utc::now(),
        }
    }
}

/// The rendering surface. Out of scope here — implementations consume the
/// canonical payload and own everything that happens after.
pub trait VisualizationSink {
    fn render(&mut self, payload: VisualizationPayload) -> CaptureResult<()>;
}

/// Sink that writes each payload as one JSON line, for piping into whatever
/// renders it.
pub struct JsonLineSink<W: Write> {
    writer: W,
}

impl JsonLineSink<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> JsonLineSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> VisualizationSink for JsonLineSink<W> {
    fn render(&mut self, payload: VisualizationPayload) -> CaptureResult<()> {
        serde_json::to_writer(&mut self.writer, &payload)?;
        writeln!(self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Capture `expression` from the paused target and hand it to the sink.
pub async fn visualize_variable<S: DebugSession, K: VisualizationSink>(
    session: &mut S,
    expression: &str,
    config: &CaptureConfig,
    sink: &mut K,
) -> CaptureResult<()> {
    let tensor = capture_variable(session, expression, config).await?;
    tracing::info!(
        expression,
        shape = ?tensor.shape(),
        dtype = tensor.dtype(),
        "captured variable"
    );
    sink.render(VisualizationPayload::from_tensor(expression, &tensor))
}

/// Decode an image file and hand it to the sink. The display name is the
/// file name.
pub fn visualize_image<K: VisualizationSink>(path: &Path, sink: &mut K) -> CaptureResult<()> {
    let tensor = varlens::decode_from_file(path)?;
    tracing::info!(
        path = %path.display(),
        shape = ?tensor.shape(),
        "decoded image file"
    );
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("image")
        .to_string();
    sink.render(VisualizationPayload::from_tensor(name, &tensor))
}
