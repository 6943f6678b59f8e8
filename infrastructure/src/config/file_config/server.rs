//! Server configuration from TOML (`[server]` section)

use serde::{Deserialize, Serialize};

/// Accepted values of `server.framing`
pub const FRAMINGS: &[&str] = &["sse", "data-stream"];

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileServerConfig {
    /// Listen address (default: "127.0.0.1:3000")
    pub bind: String,
    /// Wall-clock ceiling for one turn (default: 30)
    pub max_duration_seconds: u64,
    /// Output framing: "sse" or "data-stream" (default: "data-stream")
    pub framing: String,
}

impl Default for FileServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:3000".to_string(),
            max_duration_seconds: 30,
            framing: "data-stream".to_string(),
        }
    }
}
