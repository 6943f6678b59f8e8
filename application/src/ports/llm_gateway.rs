//! LLM Gateway port
//!
//! Defines the interface for streaming chat completions from a model
//! provider.

use assistant_domain::{LlmStreamEvent, Message, Model, ToolDeclaration};
use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

/// Errors that can occur before or while opening a model stream
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Stream protocol error: {0}")]
    StreamProtocol(String),

    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    #[error("Timeout")]
    Timeout,

    #[error("Other error: {0}")]
    Other(String),
}

impl GatewayError {
    /// Malformed framing from the provider, as opposed to a failed request
    pub fn is_protocol(&self) -> bool {
        matches!(self, GatewayError::StreamProtocol(_))
    }
}

/// One model request: the full history plus the tools declared for it.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub model: Model,
    /// System prompt, sent ahead of `messages`
    pub system: String,
    pub messages: Vec<Message>,
    pub tools: Vec<ToolDeclaration>,
    pub temperature: Option<f32>,
}

/// Gateway for LLM communication
///
/// Implementations (adapters) live in the infrastructure layer. Each call is
/// a fresh, non-idempotent request; the gateway never retries on its own.
#[async_trait]
pub trait LlmGateway: Send + Sync {
    /// Open a streamed completion for `request`.
    async fn stream_chat(&self, request: ChatRequest) -> Result<StreamHandle, GatewayError>;
}

/// Handle for receiving streaming events from a model response.
///
/// Wraps an `mpsc::Receiver<LlmStreamEvent>`. A well-formed stream ends with
/// [`LlmStreamEvent::Finished`]; a channel that closes before that means the
/// upstream connection broke mid-response.
#[derive(Debug)]
pub struct StreamHandle {
    pub receiver: mpsc::Receiver<LlmStreamEvent>,
}

impl StreamHandle {
    pub fn new(receiver: mpsc::Receiver<LlmStreamEvent>) -> Self {
        Self { receiver }
    }

    /// Build a handle that replays a fixed list of events.
    pub fn from_events(events: Vec<LlmStreamEvent>) -> Self {
        let (tx, rx) = mpsc::channel(events.len().max(1));
        for event in events {
            // Capacity covers every event, so this never blocks
            let _ = tx.try_send(event);
        }
        Self::new(rx)
    }

    pub async fn recv(&mut self) -> Option<LlmStreamEvent> {
        self.receiver.recv().await
    }

    /// Consume the stream and collect all text into a single string.
    pub async fn collect_text(mut self) -> Result<String, GatewayError> {
        let mut full_text = String::new();
        while let Some(event) = self.receiver.recv().await {
            match event {
                LlmStreamEvent::TextDelta(chunk) => full_text.push_str(&chunk),
                LlmStreamEvent::Finished(_) => return Ok(full_text),
                LlmStreamEvent::Error(e) => return Err(GatewayError::StreamProtocol(e)),
                LlmStreamEvent::ToolCallDelta { .. } => {}
            }
        }
        Err(GatewayError::StreamProtocol(
            "stream closed without a finish signal".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assistant_domain::StopReason;

    #[tokio::test]
    async fn test_collect_text() {
        let handle = StreamHandle::from_events(vec![
            LlmStreamEvent::TextDelta("Hel".into()),
            LlmStreamEvent::TextDelta("lo".into()),
            LlmStreamEvent::Finished(StopReason::EndTurn),
        ]);
        assert_eq!(handle.collect_text().await.unwrap(), "Hello");
    }

    #[tokio::test]
    async fn test_collect_text_requires_finish() {
        let handle = StreamHandle::from_events(vec![LlmStreamEvent::TextDelta("Hel".into())]);
        let err = handle.collect_text().await.unwrap_err();
        assert!(err.is_protocol());
    }
}
