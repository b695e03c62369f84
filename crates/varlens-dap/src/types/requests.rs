//! Typed argument and body shapes for the three requests the bridge issues.

use serde::{Deserialize, Serialize};

/// One live thread in the debug target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Thread {
    pub id: i64,
    #[serde(default)]
    pub name: String,
}

/// Body of a `threads` response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ThreadsBody {
    #[serde(default)]
    pub threads: Vec<Thread>,
}

/// Arguments for `stackTrace`. The bridge only ever asks for the top frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StackTraceArgs {
    pub thread_id: i64,
    pub start_frame: u32,
    pub levels: u32,
}

/// One frame of a thread's call stack.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StackFrameInfo {
    pub id: i64,
    #[serde(default)]
    pub name: String,
}

/// Body of a `stackTrace` response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StackTraceBody {
    #[serde(default)]
    pub stack_frames: Vec<StackFrameInfo>,
}

/// Arguments for `evaluate`, bound to a captured frame in REPL context.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluateArgs {
    pub expression: String,
    pub frame_id: i64,
    pub context: String,
}

/// Body of an `evaluate` response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EvaluateBody {
    #[serde(default)]
    pub result: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stack_trace_args_use_protocol_field_names() {
        let args = StackTraceArgs {
            thread_id: 7,
            start_frame: 0,
            levels: 1,
        };
        let json = serde_json::to_value(&args).unwrap();
        assert_eq!(json["threadId"], 7);
        assert_eq!(json["startFrame"], 0);
        assert_eq!(json["levels"], 1);
    }

    #[test]
    fn absent_thread_list_parses_as_empty() {
        let body: ThreadsBody = serde_json::from_str("{}").unwrap();
        assert!(body.threads.is_empty());
    }

    #[test]
    fn extra_response_fields_are_ignored() {
        let body: StackTraceBody = serde_json::from_str(
            r#"{"stackFrames":[{"id":42,"name":"main","line":10,"column":1}],"totalFrames":12}"#,
        )
        .unwrap();
        assert_eq!(body.stack_frames[0].id, 42);
    }
}
