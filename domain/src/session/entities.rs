//! Conversation entities

use crate::core::error::DomainError;
use crate::tool::entities::ToolCall;
use crate::tool::value_objects::ToolInvocationResult;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Role of a message in a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    Tool,
}

impl Role {
    pub fn as_str(&self) -> &str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::Tool => "tool",
        }
    }
}

/// A message in a conversation (Entity)
///
/// Assistant messages may carry the tool calls the model requested; tool
/// messages carry the id of the call they answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCall>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub call_id: Option<String>,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            tool_calls: Vec::new(),
            call_id: None,
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            tool_calls: Vec::new(),
            call_id: None,
        }
    }

    pub fn assistant_with_tool_calls(content: impl Into<String>, tool_calls: Vec<ToolCall>) -> Self {
        Self {
            tool_calls,
            ..Self::assistant(content)
        }
    }

    pub fn tool_result(result: &ToolInvocationResult) -> Self {
        Self {
            role: Role::Tool,
            content: result.to_model_content(),
            tool_calls: Vec::new(),
            call_id: Some(result.call_id.clone()),
        }
    }
}

/// Ordered history for one turn (Entity)
///
/// Append-only. A tool round (the assistant message holding the calls plus
/// one result per call) is committed as a unit or not at all.
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    messages: Vec<Message>,
    turn_call_ids: HashSet<String>,
}

impl Conversation {
    /// Start a turn from client-supplied history.
    ///
    /// The history must be non-empty and must not contain `tool` messages
    /// that answer no earlier call.
    pub fn from_history(messages: Vec<Message>) -> Result<Self, DomainError> {
        if messages.is_empty() {
            return Err(DomainError::EmptyConversation);
        }

        let mut requested = HashSet::new();
        for message in &messages {
            requested.extend(message.tool_calls.iter().map(|c| c.call_id.clone()));
            if message.role == Role::Tool {
                let id = message.call_id.clone().unwrap_or_default();
                if !requested.contains(&id) {
                    return Err(DomainError::UnmatchedToolResult(id));
                }
            }
        }

        Ok(Self {
            messages,
            turn_call_ids: HashSet::new(),
        })
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Whether a call id was already committed during this turn
    pub fn has_call(&self, call_id: &str) -> bool {
        self.turn_call_ids.contains(call_id)
    }

    /// Append the model's final plain-text answer.
    pub fn append_assistant_text(&mut self, text: impl Into<String>) {
        self.messages.push(Message::assistant(text));
    }

    /// Commit one tool round atomically.
    ///
    /// `results` must contain exactly one entry per requested call, in any
    /// order; they are appended in request order. Nothing is appended when
    /// the pairing is broken.
    pub fn commit_tool_round(
        &mut self,
        text: impl Into<String>,
        calls: Vec<ToolCall>,
        results: &[ToolInvocationResult],
    ) -> Result<(), DomainError> {
        let mut round_ids = HashSet::new();
        for call in &calls {
            if self.turn_call_ids.contains(&call.call_id) || !round_ids.insert(call.call_id.clone()) {
                return Err(DomainError::DuplicateCallId(call.call_id.clone()));
            }
        }

        let mut answered = HashSet::new();
        for result in results {
            if !round_ids.contains(&result.call_id) || !answered.insert(result.call_id.clone()) {
                return Err(DomainError::UnmatchedToolResult(result.call_id.clone()));
            }
        }
        if let Some(missing) = calls.iter().find(|c| !answered.contains(&c.call_id)) {
            return Err(DomainError::UnmatchedToolResult(missing.call_id.clone()));
        }

        let ordered: Vec<Message> = calls
            .iter()
            .filter_map(|call| results.iter().find(|r| r.call_id == call.call_id))
            .map(Message::tool_result)
            .collect();

        self.turn_call_ids.extend(round_ids);
        self.messages
            .push(Message::assistant_with_tool_calls(text, calls));
        self.messages.extend(ordered);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::value_objects::ToolError;
    use serde_json::json;

    fn call(id: &str) -> ToolCall {
        ToolCall::new(id, "create_personalization_experience", "{}")
    }

    fn ok(id: &str) -> ToolInvocationResult {
        ToolInvocationResult::success(id, "create_personalization_experience", json!({"ref": id}))
    }

    #[test]
    fn test_from_history_rejects_empty() {
        assert_eq!(
            Conversation::from_history(vec![]).unwrap_err(),
            DomainError::EmptyConversation
        );
    }

    #[test]
    fn test_from_history_rejects_orphan_tool_message() {
        let orphan = Message::tool_result(&ok("call_x"));
        let err = Conversation::from_history(vec![Message::user("hi"), orphan]).unwrap_err();
        assert_eq!(err, DomainError::UnmatchedToolResult("call_x".into()));
    }

    #[test]
    fn test_commit_appends_request_then_results_in_request_order() {
        let mut conversation = Conversation::from_history(vec![Message::user("go")]).unwrap();
        conversation
            .commit_tool_round("working", vec![call("b"), call("a")], &[ok("a"), ok("b")])
            .unwrap();

        let messages = conversation.messages();
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[1].role, Role::Assistant);
        assert_eq!(messages[1].tool_calls.len(), 2);
        assert_eq!(messages[2].call_id.as_deref(), Some("b"));
        assert_eq!(messages[3].call_id.as_deref(), Some("a"));
        assert!(conversation.has_call("a"));
    }

    #[test]
    fn test_commit_is_all_or_nothing() {
        let mut conversation = Conversation::from_history(vec![Message::user("go")]).unwrap();

        // Missing result for "b"
        let err = conversation
            .commit_tool_round("", vec![call("a"), call("b")], &[ok("a")])
            .unwrap_err();
        assert_eq!(err, DomainError::UnmatchedToolResult("b".into()));
        assert_eq!(conversation.len(), 1);

        // Result with no request
        let err = conversation
            .commit_tool_round("", vec![call("a")], &[ok("a"), ok("z")])
            .unwrap_err();
        assert_eq!(err, DomainError::UnmatchedToolResult("z".into()));
        assert_eq!(conversation.len(), 1);
    }

    #[test]
    fn test_call_ids_unique_within_turn() {
        let mut conversation = Conversation::from_history(vec![Message::user("go")]).unwrap();
        conversation
            .commit_tool_round("", vec![call("a")], &[ok("a")])
            .unwrap();

        let err = conversation
            .commit_tool_round("", vec![call("a")], &[ok("a")])
            .unwrap_err();
        assert_eq!(err, DomainError::DuplicateCallId("a".into()));

        let err = conversation
            .commit_tool_round("", vec![call("c"), call("c")], &[ok("c")])
            .unwrap_err();
        assert_eq!(err, DomainError::DuplicateCallId("c".into()));
        assert_eq!(conversation.len(), 3);
    }

    #[test]
    fn test_tool_message_content_comes_from_result() {
        let failure = ToolInvocationResult::failure(
            "a",
            "create_personalization_experience",
            ToolError::invalid_argument("channels: at least one entry required"),
        );
        let message = Message::tool_result(&failure);
        assert_eq!(message.role, Role::Tool);
        assert!(message.content.contains("channels: at least one entry required"));
    }
}
