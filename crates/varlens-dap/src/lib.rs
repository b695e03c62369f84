//! VarLens DAP bridge — drives a paused debug target through the
//! threads → stackTrace → evaluate exchange and hands the captured value,
//! normalized to a canonical tensor, to a visualization sink.

pub mod bridge;
pub mod capture;
pub mod config;
pub mod protocol;
pub mod resolve;
pub mod transport;
pub mod types;

pub use bridge::{capture_variable, CaptureConfig, DebugTargetHandle, OutputPaths};
pub use capture::{visualize_image, visualize_variable, JsonLineSink, VisualizationPayload, VisualizationSink};
pub use protocol::{DapClient, DebugSession};
pub use resolve::{resolve_expression, ExpressionPrompt, InteractivePrompt};
pub use types::*;
