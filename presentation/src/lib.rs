//! Presentation layer for asset-assistant
//!
//! This crate contains the HTTP surface, the stream multiplexer that frames
//! turn events for the wire, and CLI definitions.

pub mod cli;
pub mod http;

// Re-export commonly used types
pub use cli::commands::Cli;
pub use http::{ApiError, AppState, ChatBody, Framing, relay, router};
