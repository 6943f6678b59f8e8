//! Streaming events from the language model.
//!
//! [`LlmStreamEvent`] is one decoded chunk of an upstream model response.
//! Tool calls arrive fragmented across chunks; [`ToolCallAccumulator`]
//! stitches the fragments back together by index.

use crate::tool::entities::ToolCall;
use std::collections::BTreeMap;
use thiserror::Error;

/// Why the model stopped generating
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    EndTurn,
    ToolCalls,
    MaxTokens,
    ContentFilter,
    Other(String),
}

impl StopReason {
    /// Map an OpenAI-style `finish_reason`.
    pub fn from_finish_reason(reason: &str) -> Self {
        match reason {
            "stop" => StopReason::EndTurn,
            "tool_calls" | "function_call" => StopReason::ToolCalls,
            "length" => StopReason::MaxTokens,
            "content_filter" => StopReason::ContentFilter,
            other => StopReason::Other(other.to_string()),
        }
    }
}

/// An event in a streaming model response.
#[derive(Debug, Clone, PartialEq)]
pub enum LlmStreamEvent {
    /// A text chunk from the model.
    TextDelta(String),
    /// Incremental tool call data.
    ///
    /// The first delta for an index usually carries `id` and `name`; later
    /// ones carry `arguments_delta` fragments to be concatenated.
    ToolCallDelta {
        index: usize,
        id: Option<String>,
        name: Option<String>,
        arguments_delta: Option<String>,
    },
    /// The model finished its response.
    Finished(StopReason),
    /// The upstream stream broke or sent something undecodable.
    Error(String),
}

impl LlmStreamEvent {
    /// Returns true if this event signals the end of the stream.
    pub fn is_terminal(&self) -> bool {
        matches!(self, LlmStreamEvent::Finished(_) | LlmStreamEvent::Error(_))
    }
}

/// A tool call fragment set that could not be completed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssemblyError {
    #[error("tool call at index {0} has no id")]
    MissingId(usize),

    #[error("tool call at index {0} has no name")]
    MissingName(usize),
}

#[derive(Debug, Default)]
struct PartialCall {
    id: Option<String>,
    name: Option<String>,
    arguments: String,
}

/// Collects [`LlmStreamEvent::ToolCallDelta`] fragments.
#[derive(Debug, Default)]
pub struct ToolCallAccumulator {
    partials: BTreeMap<usize, PartialCall>,
}

impl ToolCallAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(
        &mut self,
        index: usize,
        id: Option<String>,
        name: Option<String>,
        arguments_delta: Option<String>,
    ) {
        let partial = self.partials.entry(index).or_default();
        if let Some(id) = id.filter(|s| !s.is_empty()) {
            partial.id = Some(id);
        }
        if let Some(name) = name.filter(|s| !s.is_empty()) {
            partial.name = Some(name);
        }
        if let Some(delta) = arguments_delta {
            partial.arguments.push_str(&delta);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.partials.is_empty()
    }

    /// Complete all calls, ordered by index.
    pub fn finish(self) -> Result<Vec<ToolCall>, AssemblyError> {
        self.partials
            .into_iter()
            .map(|(index, partial)| {
                let id = partial.id.ok_or(AssemblyError::MissingId(index))?;
                let name = partial.name.ok_or(AssemblyError::MissingName(index))?;
                Ok(ToolCall::new(id, name, partial.arguments))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finish_reason_mapping() {
        assert_eq!(StopReason::from_finish_reason("stop"), StopReason::EndTurn);
        assert_eq!(StopReason::from_finish_reason("tool_calls"), StopReason::ToolCalls);
        assert_eq!(StopReason::from_finish_reason("length"), StopReason::MaxTokens);
        assert_eq!(
            StopReason::from_finish_reason("weird"),
            StopReason::Other("weird".into())
        );
    }

    #[test]
    fn test_accumulator_stitches_fragments_by_index() {
        let mut acc = ToolCallAccumulator::new();
        acc.push(1, Some("call_b".into()), Some("list_personalization_experiences".into()), None);
        acc.push(0, Some("call_a".into()), Some("create_personalization_experience".into()), Some("{\"na".into()));
        acc.push(0, None, None, Some("me\":\"x\"}".into()));
        acc.push(1, None, None, Some("{}".into()));

        let calls = acc.finish().unwrap();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].call_id, "call_a");
        assert_eq!(calls[0].raw_arguments, "{\"name\":\"x\"}");
        assert_eq!(calls[1].tool_name, "list_personalization_experiences");
    }

    #[test]
    fn test_accumulator_rejects_incomplete_call() {
        let mut acc = ToolCallAccumulator::new();
        acc.push(0, None, Some("create_personalization_experience".into()), Some("{}".into()));
        assert_eq!(acc.finish().unwrap_err(), AssemblyError::MissingId(0));

        let mut acc = ToolCallAccumulator::new();
        acc.push(0, Some("call_a".into()), Some(String::new()), None);
        assert_eq!(acc.finish().unwrap_err(), AssemblyError::MissingName(0));
    }

    #[test]
    fn test_terminal_events() {
        assert!(LlmStreamEvent::Finished(StopReason::EndTurn).is_terminal());
        assert!(LlmStreamEvent::Error("boom".into()).is_terminal());
        assert!(!LlmStreamEvent::TextDelta("hi".into()).is_terminal());
    }
}
