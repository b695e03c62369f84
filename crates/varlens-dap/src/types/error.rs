//! Error taxonomy for the capture pipeline.
//!
//! Every variant is terminal for the invocation that raised it: the causes
//! (user cancelled, target not paused, unsupported file) are not transient,
//! so nothing here is retried.

/// All errors that can occur while capturing and visualizing a value.
#[derive(thiserror::Error, Debug)]
pub enum CaptureError {
    /// No explicit target, no selection, and the prompt yielded nothing.
    #[error("nothing to visualize")]
    NoVariableSelected,

    /// No debug adapter reachable; there is nothing to capture from.
    #[error("no active debug session")]
    NoActiveSession,

    #[error("no threads in the debug target")]
    NoThreads,

    #[error("no stack frame available")]
    NoStackFrame,

    /// The companion script reported anything other than its `OK` marker.
    /// The raw result text is surfaced verbatim.
    #[error("evaluation failed: {0}")]
    EvaluationFailed(String),

    #[error("capture timed out waiting for the debug adapter")]
    CaptureTimedOut,

    /// The adapter rejected a request outright.
    #[error("'{command}' request failed: {message}")]
    RequestFailed { command: String, message: String },

    /// The adapter replied with something the protocol types cannot hold.
    #[error("malformed adapter reply: {0}")]
    Protocol(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("prompt error: {0}")]
    Prompt(String),

    #[error(transparent)]
    Lens(#[from] varlens::LensError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience result type.
pub type CaptureResult<T> = Result<T, CaptureError>;
