//! Outbound events of a turn

use crate::tool::value_objects::ToolInvocationResult;
use serde::Serialize;
use serde_json::Value;

/// Category of a turn-ending error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Malformed upstream framing or broken request/result pairing
    StreamProtocol,
    /// The model provider could not be reached or refused the request
    Upstream,
    /// The wall-clock budget elapsed
    Timeout,
    /// Too many tool rounds in one turn
    RoundLimit,
    /// The turn was cancelled by the host
    Cancelled,
}

impl ErrorKind {
    pub fn as_str(&self) -> &str {
        match self {
            ErrorKind::StreamProtocol => "stream_protocol",
            ErrorKind::Upstream => "upstream",
            ErrorKind::Timeout => "timeout",
            ErrorKind::RoundLimit => "round_limit",
            ErrorKind::Cancelled => "cancelled",
        }
    }
}

/// One unit of the ordered output of a turn.
///
/// For any call, `ToolCallStart` is always emitted before its
/// `ToolCallResult`. `Error` and `Done` are terminal; nothing follows them.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum StreamEvent {
    TextDelta {
        text: String,
    },
    #[serde(rename_all = "camelCase")]
    ToolCallStart {
        call_id: String,
        tool_name: String,
        args: Value,
    },
    ToolCallResult {
        result: ToolInvocationResult,
    },
    Error {
        kind: ErrorKind,
        detail: String,
    },
    Done,
}

impl StreamEvent {
    pub fn text(text: impl Into<String>) -> Self {
        StreamEvent::TextDelta { text: text.into() }
    }

    pub fn error(kind: ErrorKind, detail: impl Into<String>) -> Self {
        StreamEvent::Error {
            kind,
            detail: detail.into(),
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, StreamEvent::Error { .. } | StreamEvent::Done)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_serialized_shape() {
        let start = StreamEvent::ToolCallStart {
            call_id: "call_1".into(),
            tool_name: "list_personalization_experiences".into(),
            args: json!({"limit": 5}),
        };
        assert_eq!(
            serde_json::to_value(&start).unwrap(),
            json!({
                "type": "tool-call-start",
                "callId": "call_1",
                "toolName": "list_personalization_experiences",
                "args": {"limit": 5}
            })
        );

        let err = StreamEvent::error(ErrorKind::Timeout, "turn exceeded 30s");
        assert_eq!(
            serde_json::to_value(&err).unwrap(),
            json!({"type": "error", "kind": "timeout", "detail": "turn exceeded 30s"})
        );
        assert_eq!(serde_json::to_value(StreamEvent::Done).unwrap(), json!({"type": "done"}));
    }

    #[test]
    fn test_terminal() {
        assert!(StreamEvent::Done.is_terminal());
        assert!(StreamEvent::error(ErrorKind::Upstream, "x").is_terminal());
        assert!(!StreamEvent::text("hi").is_terminal());
    }
}
