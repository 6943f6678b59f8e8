//! Application layer for asset-assistant
//!
//! This crate contains the turn orchestration use case, the tool registry,
//! port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod tools;
pub mod use_cases;

// Re-export commonly used types
pub use config::TurnPolicy;
pub use ports::{
    conversation_logger::{
        ConversationEvent, ConversationLogger, MemoryConversationLogger, NoConversationLogger,
    },
    llm_gateway::{ChatRequest, GatewayError, LlmGateway, StreamHandle},
    tool_executor::{RemoteResult, ToolExecutor},
};
pub use tools::{DeclaredTools, ToolEntry, ToolNotFound, ToolRegistry};
pub use use_cases::run_turn::{
    RunTurnError, RunTurnInput, RunTurnUseCase, TurnHandle, TurnOutcome,
};
