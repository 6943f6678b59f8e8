//! Streaming chat completions gateway.

use super::sse::{SseDecoder, SseFrame};
use super::types::{ChatCompletionRequest, ChunkDecoder};
use crate::config::FileOpenAiConfig;
use assistant_application::{ChatRequest, GatewayError, LlmGateway, StreamHandle};
use assistant_domain::{LlmStreamEvent, StopReason};
use assistant_domain::util::abbreviate;
use async_trait::async_trait;
use futures::StreamExt;
use std::ops::ControlFlow;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Events buffered between the body reader and the turn loop
const STREAM_BUFFER: usize = 128;

/// Longest upstream error body quoted in a [`GatewayError`]
const ERROR_BODY_LIMIT: usize = 300;

/// [`LlmGateway`] for any OpenAI-compatible `/v1/chat/completions` endpoint.
///
/// Each call is one POST with `stream: true`. The body is read on a spawned
/// task that forwards decoded events into the returned [`StreamHandle`]; the
/// task stops as soon as the handle is dropped.
#[derive(Debug, Clone)]
pub struct OpenAiGateway {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    max_tokens: u32,
}

impl OpenAiGateway {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key,
            max_tokens: 4096,
        }
    }

    pub fn from_config(config: &FileOpenAiConfig) -> Self {
        let api_key = config.resolve_api_key();
        if api_key.is_none() {
            warn!(
                env = %config.api_key_env,
                "No model API key configured; requests will be sent unauthenticated"
            );
        }
        Self::new(config.base_url.clone(), api_key).with_max_tokens(config.max_tokens)
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/v1/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl LlmGateway for OpenAiGateway {
    async fn stream_chat(&self, request: ChatRequest) -> Result<StreamHandle, GatewayError> {
        let body = ChatCompletionRequest::from_request(&request, self.max_tokens);
        debug!(
            model = %request.model,
            messages = body.messages.len(),
            tools = body.tools.len(),
            "Sending chat completion request"
        );

        let mut builder = self.client.post(self.endpoint()).json(&body);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                GatewayError::Timeout
            } else {
                GatewayError::ConnectionError(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            warn!(status = %status, "Chat completion request rejected");
            let detail = format!("status {}: {}", status, abbreviate(&text, ERROR_BODY_LIMIT));
            return Err(if status == reqwest::StatusCode::NOT_FOUND {
                GatewayError::ModelNotAvailable(format!("{} ({})", request.model, detail))
            } else {
                GatewayError::RequestFailed(detail)
            });
        }

        let (tx, rx) = mpsc::channel(STREAM_BUFFER);
        tokio::spawn(pump(response, tx));
        Ok(StreamHandle::new(rx))
    }
}

/// Read the body to the end, forwarding decoded events.
///
/// Exactly one terminal event is sent: `Finished` on `[DONE]` (or on a clean
/// close after a finish reason), `Error` otherwise.
async fn pump(response: reqwest::Response, tx: mpsc::Sender<LlmStreamEvent>) {
    let mut body = response.bytes_stream();
    let mut sse = SseDecoder::new();
    let mut chunks = ChunkDecoder::default();

    while let Some(next) = body.next().await {
        let bytes = match next {
            Ok(bytes) => bytes,
            Err(e) => {
                let _ = tx
                    .send(LlmStreamEvent::Error(format!("stream read failed: {}", e)))
                    .await;
                return;
            }
        };
        for frame in sse.push(&bytes) {
            if forward(frame, &mut chunks, &tx).await.is_break() {
                return;
            }
        }
    }

    if let Some(frame) = sse.finish() {
        if forward(frame, &mut chunks, &tx).await.is_break() {
            return;
        }
    }

    let terminal = match chunks.finish_reason() {
        Some(reason) => {
            debug!("Stream closed without [DONE] after a finish reason");
            LlmStreamEvent::Finished(reason.clone())
        }
        None => LlmStreamEvent::Error("stream closed before the model finished".to_string()),
    };
    let _ = tx.send(terminal).await;
}

async fn forward(
    frame: SseFrame,
    chunks: &mut ChunkDecoder,
    tx: &mpsc::Sender<LlmStreamEvent>,
) -> ControlFlow<()> {
    match frame {
        SseFrame::Done => {
            let reason = chunks
                .finish_reason()
                .cloned()
                .unwrap_or(StopReason::EndTurn);
            let _ = tx.send(LlmStreamEvent::Finished(reason)).await;
            ControlFlow::Break(())
        }
        SseFrame::Data(data) => match chunks.decode(&data) {
            Ok(events) => {
                for event in events {
                    if tx.send(event).await.is_err() {
                        // Receiver dropped: the turn is over
                        return ControlFlow::Break(());
                    }
                }
                ControlFlow::Continue(())
            }
            Err(detail) => {
                warn!(detail = %detail, "Undecodable stream chunk");
                let _ = tx.send(LlmStreamEvent::Error(detail)).await;
                ControlFlow::Break(())
            }
        },
    }
}
