//! Conversation and model-stream domain.
//!
//! - [`entities::Conversation`]: append-only message history for one turn
//! - [`entities::Message`]: a single `user`, `assistant` or `tool` message
//! - [`stream::LlmStreamEvent`]: one chunk of a streamed model response
//! - [`stream::ToolCallAccumulator`]: reassembles fragmented tool calls

pub mod entities;
pub mod stream;
