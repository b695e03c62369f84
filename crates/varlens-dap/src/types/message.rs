//! Debug Adapter Protocol base message types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An outgoing DAP request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestMessage {
    pub seq: u64,
    pub command: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arguments: Option<Value>,
}

/// An incoming DAP response, matched to its request by `request_seq`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseMessage {
    pub seq: u64,
    pub request_seq: u64,
    pub success: bool,
    pub command: String,
    /// Error text on failed responses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
}

/// An adapter-initiated event. The bridge never acts on these, but they
/// arrive interleaved with responses and must be parseable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventMessage {
    pub seq: u64,
    pub event: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
}

/// Union type for any DAP protocol message, discriminated by `type`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DapMessage {
    Request(RequestMessage),
    Response(ResponseMessage),
    Event(EventMessage),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_tag_discriminates_messages() {
        let parsed: DapMessage = serde_json::from_str(
            r#"{"type":"response","seq":3,"request_seq":1,"success":true,"command":"threads","body":{"threads":[]}}"#,
        )
        .unwrap();
        match parsed {
            DapMessage::Response(resp) => {
                assert_eq!(resp.request_seq, 1);
                assert!(resp.success);
            }
            other => panic!("expected response, got {other:?}"),
        }
    }

    #[test]
    fn requests_serialize_with_type_tag() {
        let msg = DapMessage::Request(RequestMessage {
            seq: 1,
            command: "threads".to_string(),
            arguments: None,
        });
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["type"], "request");
        assert_eq!(json["command"], "threads");
        assert!(json.get("arguments").is_none());
    }
}
