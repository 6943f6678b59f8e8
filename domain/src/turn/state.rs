//! Turn lifecycle

use crate::core::error::DomainError;
use std::fmt;

/// Lifecycle of a single turn.
///
/// ```text
/// Streaming ──► ToolPending ──► ToolExecuting ──► Streaming ──► Finalized
///     │              │                │
///     └──────────────┴────────────────┴──────────────────────────► Failed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TurnState {
    /// The model is emitting a response
    #[default]
    Streaming,
    /// The model requested one or more tool calls
    ToolPending,
    /// Pending calls are being validated and dispatched
    ToolExecuting,
    /// The model completed with no outstanding tool calls
    Finalized,
    /// Unrecoverable transport or protocol error, timeout or cancellation
    Failed,
}

impl TurnState {
    pub fn as_str(&self) -> &str {
        match self {
            TurnState::Streaming => "streaming",
            TurnState::ToolPending => "tool_pending",
            TurnState::ToolExecuting => "tool_executing",
            TurnState::Finalized => "finalized",
            TurnState::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, TurnState::Finalized | TurnState::Failed)
    }

    pub fn can_transition_to(&self, next: TurnState) -> bool {
        use TurnState::*;
        match (self, next) {
            (Finalized | Failed, _) => false,
            (_, Failed) => true,
            (Streaming, ToolPending | Finalized) => true,
            (ToolPending, ToolExecuting) => true,
            (ToolExecuting, Streaming) => true,
            _ => false,
        }
    }

    /// Move to `next`, rejecting transitions the lifecycle does not allow.
    pub fn transition(&mut self, next: TurnState) -> Result<(), DomainError> {
        if !self.can_transition_to(next) {
            return Err(DomainError::InvalidTransition {
                from: self.to_string(),
                to: next.to_string(),
            });
        }
        *self = next;
        Ok(())
    }
}

impl fmt::Display for TurnState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_round_trip() {
        let mut state = TurnState::default();
        state.transition(TurnState::ToolPending).unwrap();
        state.transition(TurnState::ToolExecuting).unwrap();
        state.transition(TurnState::Streaming).unwrap();
        state.transition(TurnState::Finalized).unwrap();
        assert!(state.is_terminal());
    }

    #[test]
    fn test_any_live_state_can_fail() {
        for start in [TurnState::Streaming, TurnState::ToolPending, TurnState::ToolExecuting] {
            let mut state = start;
            state.transition(TurnState::Failed).unwrap();
        }
    }

    #[test]
    fn test_rejected_transitions() {
        let mut state = TurnState::Streaming;
        let err = state.transition(TurnState::ToolExecuting).unwrap_err();
        assert_eq!(
            err,
            DomainError::InvalidTransition {
                from: "streaming".into(),
                to: "tool_executing".into()
            }
        );
        assert_eq!(state, TurnState::Streaming);

        let mut done = TurnState::Finalized;
        assert!(done.transition(TurnState::Failed).is_err());
        assert!(!TurnState::ToolPending.can_transition_to(TurnState::Finalized));
    }
}
