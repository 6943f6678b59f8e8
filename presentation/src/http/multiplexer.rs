//! Stream multiplexer: turn events to response body frames.
//!
//! Frames are produced one event at a time, so the first text fragment
//! reaches the client as soon as the model emits it. The body ends right
//! after the first terminal event (`Done` or `Error`).

use assistant_domain::StreamEvent;
use bytes::Bytes;
use futures::{Stream, StreamExt};
use serde::Serialize;
use serde_json::json;
use std::str::FromStr;
use tracing::warn;

/// Wire framing of the response body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Framing {
    /// Server-sent events: `data: {json}\n\n` per event
    Sse,
    /// AI SDK data stream: one `<code>:<json>\n` line per event
    #[default]
    DataStream,
}

impl Framing {
    pub fn as_str(&self) -> &'static str {
        match self {
            Framing::Sse => "sse",
            Framing::DataStream => "data-stream",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            Framing::Sse => "text/event-stream",
            Framing::DataStream => "text/plain; charset=utf-8",
        }
    }

    /// Encode one event as a complete frame.
    pub fn encode(&self, event: &StreamEvent) -> Bytes {
        match self {
            Framing::Sse => Bytes::from(format!("data: {}\n\n", to_json(event))),
            Framing::DataStream => Bytes::from(data_stream_line(event)),
        }
    }
}

impl std::fmt::Display for Framing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Framing {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sse" => Ok(Framing::Sse),
            "data-stream" | "data_stream" => Ok(Framing::DataStream),
            other => Err(format!("unknown framing: {}", other)),
        }
    }
}

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| {
        warn!(error = %e, "Failed to serialize stream event");
        json!({"type": "error", "kind": "stream_protocol", "detail": "unserializable event"})
            .to_string()
    })
}

fn data_stream_line(event: &StreamEvent) -> String {
    match event {
        StreamEvent::TextDelta { text } => format!("0:{}\n", to_json(text)),
        StreamEvent::ToolCallStart {
            call_id,
            tool_name,
            args,
        } => format!(
            "9:{}\n",
            json!({"toolCallId": call_id, "toolName": tool_name, "args": args})
        ),
        StreamEvent::ToolCallResult { result } => format!(
            "a:{}\n",
            json!({"toolCallId": result.call_id, "result": result})
        ),
        StreamEvent::Error { detail, .. } => format!("3:{}\n", to_json(detail)),
        StreamEvent::Done => format!("d:{}\n", json!({"finishReason": "stop"})),
    }
}

/// Relay events as encoded frames, in order, ending after the first
/// terminal event.
pub fn relay<S>(events: S, framing: Framing) -> impl Stream<Item = Bytes> + Send + 'static
where
    S: Stream<Item = StreamEvent> + Send + Unpin + 'static,
{
    futures::stream::unfold((events, false), move |(mut events, finished)| async move {
        if finished {
            return None;
        }
        let event = events.next().await?;
        let terminal = event.is_terminal();
        Some((framing.encode(&event), (events, terminal)))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assistant_domain::{ErrorKind, ToolError, ToolInvocationResult};
    use futures::stream;

    fn frames(events: Vec<StreamEvent>, framing: Framing) -> Vec<String> {
        let relayed = relay(stream::iter(events), framing);
        futures::executor::block_on(relayed.collect::<Vec<_>>())
            .into_iter()
            .map(|b| String::from_utf8(b.to_vec()).unwrap())
            .collect()
    }

    #[test]
    fn test_data_stream_lines() {
        let result = ToolInvocationResult::failure(
            "c1",
            "create_personalization_experience",
            ToolError::invalid_argument("channels: at least one entry required"),
        );
        let lines = frames(
            vec![
                StreamEvent::text("Creating \"Launch\""),
                StreamEvent::ToolCallStart {
                    call_id: "c1".into(),
                    tool_name: "create_personalization_experience".into(),
                    args: json!({"name": "Launch"}),
                },
                StreamEvent::ToolCallResult { result },
                StreamEvent::Done,
            ],
            Framing::DataStream,
        );

        assert_eq!(lines[0], "0:\"Creating \\\"Launch\\\"\"\n");
        assert!(lines[1].starts_with("9:{"));
        assert!(lines[1].contains("\"toolCallId\":\"c1\""));
        assert!(lines[2].starts_with("a:{"));
        assert!(lines[2].contains("INVALID_ARGUMENT"));
        assert_eq!(lines[3], "d:{\"finishReason\":\"stop\"}\n");
    }

    #[test]
    fn test_sse_frames() {
        let lines = frames(vec![StreamEvent::text("Hi"), StreamEvent::Done], Framing::Sse);
        assert_eq!(
            lines,
            vec![
                "data: {\"type\":\"text-delta\",\"text\":\"Hi\"}\n\n".to_string(),
                "data: {\"type\":\"done\"}\n\n".to_string(),
            ]
        );
    }

    #[test]
    fn test_stops_after_error_keeping_earlier_text() {
        let lines = frames(
            vec![
                StreamEvent::text("partial"),
                StreamEvent::error(ErrorKind::Timeout, "turn exceeded 30s"),
                StreamEvent::text("never sent"),
            ],
            Framing::DataStream,
        );
        assert_eq!(lines, vec!["0:\"partial\"\n", "3:\"turn exceeded 30s\"\n"]);
    }

    #[test]
    fn test_framing_parse() {
        assert_eq!("sse".parse::<Framing>().unwrap(), Framing::Sse);
        assert_eq!("Data-Stream".parse::<Framing>().unwrap(), Framing::DataStream);
        assert!("websocket".parse::<Framing>().is_err());
        assert_eq!(Framing::default().to_string(), "data-stream");
    }
}
