//! Debug session bridge — the strict threads → stackTrace → evaluate
//! exchange that makes a paused target serialize a value to disk.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::Value;
use uuid::Uuid;
use varlens::Tensor;

use crate::protocol::DebugSession;
use crate::types::{
    CaptureError, CaptureResult, EvaluateArgs, EvaluateBody, StackTraceArgs, StackTraceBody,
    ThreadsBody,
};

/// Module the evaluation expression imports inside the target. Its `save`
/// routine is contracted to write the two output files and echo `OK`.
const COMPANION_MODULE: &str = "save_data";

/// Substring marking a successful companion run. Anything else in the
/// evaluation result is a failure surfaced verbatim.
const SUCCESS_MARKER: &str = "OK";

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Where the companion script lives and where its output lands.
#[derive(Debug, Clone)]
pub struct CaptureConfig {
    /// Directory appended to the target's module search path.
    pub script_dir: PathBuf,
    /// Directory receiving the per-invocation output files.
    pub output_dir: PathBuf,
    /// Bound on each adapter round trip.
    pub request_timeout: Duration,
}

impl CaptureConfig {
    pub fn new(script_dir: PathBuf, output_dir: PathBuf) -> Self {
        Self {
            script_dir,
            output_dir,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

/// The thread and top stack frame a capture evaluates against. Acquired
/// fresh for every capture — the paused location and thread set can change
/// between debugger stops, so handles are never cached.
#[derive(Debug, Clone, Copy)]
pub struct DebugTargetHandle {
    pub thread_id: i64,
    pub frame_id: i64,
}

/// Unique per-invocation output paths. Fresh names for every capture mean
/// two overlapping captures can never race on each other's files.
#[derive(Debug, Clone)]
pub struct OutputPaths {
    pub data: PathBuf,
    pub meta: PathBuf,
}

impl OutputPaths {
    pub fn unique(dir: &Path) -> Self {
        let stem = Uuid::new_v4().simple().to_string();
        Self {
            data: dir.join(format!("{stem}.b64")),
            meta: dir.join(format!("{stem}.json")),
        }
    }

    fn cleanup(&self) {
        let _ = std::fs::remove_file(&self.data);
        let _ = std::fs::remove_file(&self.meta);
    }
}

/// Capture the value of `expression` from the paused target behind `session`
/// and normalize it to a canonical tensor.
///
/// The exchange is strictly sequential and nothing is retried: a failure at
/// any step is terminal for this capture.
pub async fn capture_variable<S: DebugSession>(
    session: &mut S,
    expression: &str,
    config: &CaptureConfig,
) -> CaptureResult<Tensor> {
    let handle = acquire_target(session, config.request_timeout).await?;
    tracing::debug!(
        thread_id = handle.thread_id,
        frame_id = handle.frame_id,
        "acquired debug target"
    );

    std::fs::create_dir_all(&config.output_dir)?;
    let paths = OutputPaths::unique(&config.output_dir);

    let body = roundtrip(
        session,
        "evaluate",
        Some(serde_json::to_value(EvaluateArgs {
            expression: save_expression(expression, &config.script_dir, &paths),
            frame_id: handle.frame_id,
            context: "repl".to_string(),
        })?),
        config.request_timeout,
    )
    .await?;
    let eval: EvaluateBody = parse_body(body)?;

    if !eval.result.contains(SUCCESS_MARKER) {
        return Err(CaptureError::EvaluationFailed(eval.result));
    }

    let tensor = varlens::read_payload(&paths.data, &paths.meta)?;
    paths.cleanup();
    Ok(tensor)
}

/// Enumerate threads and take the top frame of the first one.
async fn acquire_target<S: DebugSession>(
    session: &mut S,
    timeout: Duration,
) -> CaptureResult<DebugTargetHandle> {
    let body = roundtrip(session, "threads", None, timeout).await?;
    let threads: ThreadsBody = parse_body(body)?;
    let thread_id = threads
        .threads
        .first()
        .map(|t| t.id)
        .ok_or(CaptureError::NoThreads)?;

    let body = roundtrip(
        session,
        "stackTrace",
        Some(serde_json::to_value(StackTraceArgs {
            thread_id,
            start_frame: 0,
            levels: 1,
        })?),
        timeout,
    )
    .await?;
    let frames: StackTraceBody = parse_body(body)?;
    let frame_id = frames
        .stack_frames
        .first()
        .map(|f| f.id)
        .ok_or(CaptureError::NoStackFrame)?;

    Ok(DebugTargetHandle {
        thread_id,
        frame_id,
    })
}

/// One bounded round trip. A hung adapter fails the capture instead of
/// hanging it forever.
async fn roundtrip<S: DebugSession>(
    session: &mut S,
    command: &str,
    arguments: Option<Value>,
    timeout: Duration,
) -> CaptureResult<Value> {
    tokio::time::timeout(timeout, session.request(command, arguments))
        .await
        .map_err(|_| CaptureError::CaptureTimedOut)?
}

fn parse_body<T: DeserializeOwned + Default>(body: Value) -> CaptureResult<T> {
    if body.is_null() {
        return Ok(T::default());
    }
    serde_json::from_value(body)
        .map_err(|e| CaptureError::Protocol(format!("unexpected response body: {e}")))
}

/// Build the expression the target's runtime evaluates: make the companion
/// module importable, then invoke its save routine with the variable
/// expression and both absolute output paths.
fn save_expression(variable: &str, script_dir: &Path, out: &OutputPaths) -> String {
    format!(
        "__import__('sys').path.append(r\"{}\") or __import__('{}').save({}, r\"{}\", r\"{}\")",
        script_dir.display(),
        COMPANION_MODULE,
        variable,
        out.data.display(),
        out.meta.display(),
    )
}
