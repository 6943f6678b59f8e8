//! Wire types for the chat completions endpoint.

use assistant_application::ChatRequest;
use assistant_domain::{LlmStreamEvent, Message, Role, StopReason, ToolDeclaration};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<WireMessage>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<WireTool>,
    pub stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    pub max_tokens: u32,
}

impl ChatCompletionRequest {
    pub fn from_request(request: &ChatRequest, max_tokens: u32) -> Self {
        let mut messages = Vec::with_capacity(request.messages.len() + 1);
        if !request.system.is_empty() {
            messages.push(WireMessage::system(&request.system));
        }
        messages.extend(request.messages.iter().map(WireMessage::from));

        Self {
            model: request.model.to_string(),
            messages,
            tools: request.tools.iter().map(WireTool::from).collect(),
            stream: true,
            temperature: request.temperature,
            max_tokens,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct WireMessage {
    pub role: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<WireToolCall>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl WireMessage {
    fn system(content: &str) -> Self {
        Self {
            role: "system",
            content: Some(content.to_string()),
            tool_calls: Vec::new(),
            tool_call_id: None,
        }
    }
}

impl From<&Message> for WireMessage {
    fn from(message: &Message) -> Self {
        let tool_calls: Vec<WireToolCall> = message
            .tool_calls
            .iter()
            .map(|call| WireToolCall {
                id: call.call_id.clone(),
                kind: "function",
                function: WireFunctionCall {
                    name: call.tool_name.clone(),
                    arguments: call.raw_arguments.clone(),
                },
            })
            .collect();

        // An assistant message that only requests tools has no text
        let content = if message.role == Role::Assistant
            && message.content.is_empty()
            && !tool_calls.is_empty()
        {
            None
        } else {
            Some(message.content.clone())
        };

        Self {
            role: match message.role {
                Role::User => "user",
                Role::Assistant => "assistant",
                Role::Tool => "tool",
            },
            content,
            tool_calls,
            tool_call_id: message.call_id.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct WireToolCall {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub function: WireFunctionCall,
}

#[derive(Debug, Serialize)]
pub struct WireFunctionCall {
    pub name: String,
    pub arguments: String,
}

#[derive(Debug, Serialize)]
pub struct WireTool {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub function: Value,
}

impl From<&ToolDeclaration> for WireTool {
    fn from(declaration: &ToolDeclaration) -> Self {
        Self {
            kind: "function",
            function: declaration.to_function_schema(),
        }
    }
}

// ==================== Streamed chunks ====================

#[derive(Debug, Deserialize)]
pub struct ChatCompletionChunk {
    #[serde(default)]
    pub choices: Vec<ChunkChoice>,
    #[serde(default)]
    pub error: Option<ChunkError>,
}

#[derive(Debug, Deserialize)]
pub struct ChunkChoice {
    #[serde(default)]
    pub delta: Option<ChunkDelta>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChunkDelta {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub tool_calls: Option<Vec<ChunkToolCall>>,
}

#[derive(Debug, Deserialize)]
pub struct ChunkToolCall {
    pub index: usize,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub function: Option<ChunkFunction>,
}

#[derive(Debug, Deserialize)]
pub struct ChunkFunction {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub arguments: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChunkError {
    #[serde(default)]
    pub message: String,
}

/// Turns `data:` payloads into stream events, remembering the finish
/// reason until the stream terminates.
#[derive(Debug, Default)]
pub struct ChunkDecoder {
    finish_reason: Option<StopReason>,
}

impl ChunkDecoder {
    pub fn decode(&mut self, data: &str) -> Result<Vec<LlmStreamEvent>, String> {
        let chunk: ChatCompletionChunk =
            serde_json::from_str(data).map_err(|e| format!("malformed stream chunk: {}", e))?;

        if let Some(error) = chunk.error {
            return Err(format!("upstream error: {}", error.message));
        }

        let mut events = Vec::new();
        for choice in chunk.choices {
            if let Some(delta) = choice.delta {
                if let Some(text) = delta.content.filter(|t| !t.is_empty()) {
                    events.push(LlmStreamEvent::TextDelta(text));
                }
                for call in delta.tool_calls.unwrap_or_default() {
                    let (name, arguments_delta) = call
                        .function
                        .map(|f| (f.name, f.arguments))
                        .unwrap_or((None, None));
                    events.push(LlmStreamEvent::ToolCallDelta {
                        index: call.index,
                        id: call.id,
                        name,
                        arguments_delta,
                    });
                }
            }
            if let Some(reason) = choice.finish_reason {
                self.finish_reason = Some(StopReason::from_finish_reason(&reason));
            }
        }
        Ok(events)
    }

    pub fn finish_reason(&self) -> Option<&StopReason> {
        self.finish_reason.as_ref()
    }
}
