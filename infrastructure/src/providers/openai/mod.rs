//! OpenAI-compatible chat completions adapter.
//!
//! - [`gateway::OpenAiGateway`]: [`LlmGateway`](assistant_application::LlmGateway)
//!   over `POST /v1/chat/completions` with `stream: true`
//! - [`sse::SseDecoder`]: splits the response body into `data:` frames
//! - [`types`]: wire format of requests and streamed chunks

pub mod gateway;
pub mod sse;
pub mod types;

pub use gateway::OpenAiGateway;
