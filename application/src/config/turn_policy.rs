//! Turn policy: loop control for one conversation turn.
//!
//! [`TurnPolicy`] groups the static limits applied by
//! [`RunTurnUseCase`](crate::use_cases::run_turn::RunTurnUseCase). These are
//! application-layer concerns, not domain rules.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Limits for one turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnPolicy {
    /// Hard ceiling on total turn time, model and tool calls included.
    pub max_duration: Duration,
    /// Maximum tool rounds (model asks, tools answer) in one turn.
    pub max_tool_rounds: usize,
    /// Capacity of the outbound event channel.
    pub event_buffer: usize,
}

impl Default for TurnPolicy {
    fn default() -> Self {
        Self {
            max_duration: Duration::from_secs(30),
            max_tool_rounds: 8,
            event_buffer: 64,
        }
    }
}

impl TurnPolicy {
    // ==================== Builder Methods ====================

    pub fn with_max_duration(mut self, duration: Duration) -> Self {
        self.max_duration = duration;
        self
    }

    pub fn with_max_tool_rounds(mut self, max: usize) -> Self {
        self.max_tool_rounds = max;
        self
    }

    pub fn with_event_buffer(mut self, capacity: usize) -> Self {
        self.event_buffer = capacity.max(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let policy = TurnPolicy::default();
        assert_eq!(policy.max_duration, Duration::from_secs(30));
        assert_eq!(policy.max_tool_rounds, 8);
        assert_eq!(policy.event_buffer, 64);
    }

    #[test]
    fn test_builder() {
        let policy = TurnPolicy::default()
            .with_max_duration(Duration::from_secs(5))
            .with_max_tool_rounds(2)
            .with_event_buffer(0);

        assert_eq!(policy.max_duration, Duration::from_secs(5));
        assert_eq!(policy.max_tool_rounds, 2);
        assert_eq!(policy.event_buffer, 1);
    }
}
