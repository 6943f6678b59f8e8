//! Domain layer for asset-assistant
//!
//! Pure types and rules with no I/O: platform products and tenant
//! credentials, the conversation, tool declarations with their argument
//! schemas and validator, the turn lifecycle and the events a turn emits.
//!
//! # Core Concepts
//!
//! ## Turn
//!
//! One request/response cycle. The model streams text and may request tool
//! calls; each call is validated, dispatched and answered with a
//! [`ToolInvocationResult`] before the model is resumed.
//!
//! ## Declared tools
//!
//! A tool is bound to one [`PlatformProduct`] and is only offered to the
//! model when the caller supplied a [`ClientConfiguration`] for it.

pub mod client;
pub mod core;
pub mod prompt;
pub mod session;
pub mod tool;
pub mod turn;
pub mod util;

// Re-export commonly used types
pub use client::{ClientConfiguration, ClientConfigurations};
pub use core::{error::DomainError, model::Model, product::PlatformProduct};
pub use prompt::AssistantPrompt;
pub use session::{
    entities::{Conversation, Message, Role},
    stream::{AssemblyError, LlmStreamEvent, StopReason, ToolCallAccumulator},
};
pub use tool::{
    entities::{ToolCall, ToolCapability, ToolDeclaration},
    schema::{ArgumentSchema, Property, SchemaKind},
    traits::{DefaultToolValidator, ToolValidator},
    validation::{ValidatedArguments, ValidationError, validate},
    value_objects::{InvocationStatus, ToolError, ToolInvocationResult},
};
pub use turn::{ErrorKind, StreamEvent, TurnState};
