//! Turn configuration from TOML (`[turn]` section)

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileTurnConfig {
    /// Maximum tool rounds per turn (default: 8)
    pub max_tool_rounds: usize,
    /// Outbound event channel capacity (default: 64)
    pub event_buffer: usize,
}

impl Default for FileTurnConfig {
    fn default() -> Self {
        Self {
            max_tool_rounds: 8,
            event_buffer: 64,
        }
    }
}
