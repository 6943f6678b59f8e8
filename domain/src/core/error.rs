//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Conversation is empty")]
    EmptyConversation,

    #[error("Unknown platform product: {0}")]
    UnknownProduct(String),

    #[error("Duplicate call id in turn: {0}")]
    DuplicateCallId(String),

    #[error("Tool result without matching request: {0}")]
    UnmatchedToolResult(String),

    #[error("Invalid turn transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },

    #[error("Operation cancelled")]
    Cancelled,
}

impl DomainError {
    /// Check if this error represents a cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, DomainError::Cancelled)
    }

    /// Check if this error breaks the request/result pairing of a turn
    pub fn is_protocol_violation(&self) -> bool {
        matches!(
            self,
            DomainError::DuplicateCallId(_) | DomainError::UnmatchedToolResult(_)
        )
    }
}
