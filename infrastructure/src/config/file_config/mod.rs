//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! Every section is `#[serde(default)]`, so any subset of keys is valid.

mod logging;
mod model;
mod platform;
mod providers;
mod server;
mod turn;

pub use logging::FileLoggingConfig;
pub use model::FileModelConfig;
pub use platform::{FilePersonalizeConfig, FilePlatformConfig};
pub use providers::{FileOpenAiConfig, FileProvidersConfig};
pub use server::{FRAMINGS, FileServerConfig};
pub use turn::FileTurnConfig;

use assistant_application::TurnPolicy;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Severity level of a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Fatal: the server cannot start with this value.
    Error,
    /// Non-fatal: a fallback is used instead.
    Warning,
}

/// A detected issue in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigIssue {
    pub severity: Severity,
    /// Dotted key, e.g. `server.max_duration_seconds`
    pub field: String,
    pub message: String,
}

impl ConfigIssue {
    fn error(field: &str, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            field: field.to_string(),
            message: message.into(),
        }
    }

    fn warning(field: &str, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Configuration that cannot be used
#[derive(Debug, Error)]
#[error("invalid configuration: {summary}")]
pub struct ConfigValidationError {
    pub summary: String,
    pub issues: Vec<ConfigIssue>,
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// HTTP server settings
    pub server: FileServerConfig,
    /// Model selection
    pub model: FileModelConfig,
    /// Turn limits
    pub turn: FileTurnConfig,
    /// Model provider settings
    pub providers: FileProvidersConfig,
    /// Asset platform endpoints
    pub platform: FilePlatformConfig,
    /// Transcript logging
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        if self.server.max_duration_seconds == 0 {
            issues.push(ConfigIssue::error(
                "server.max_duration_seconds",
                "server.max_duration_seconds cannot be 0",
            ));
        }

        if !FRAMINGS.contains(&self.server.framing.as_str()) {
            issues.push(ConfigIssue::warning(
                "server.framing",
                format!(
                    "server.framing: unknown value '{}', falling back to 'data-stream' (valid: {})",
                    self.server.framing,
                    FRAMINGS.join(", ")
                ),
            ));
        }

        if self.model.name.trim().is_empty() {
            issues.push(ConfigIssue::warning(
                "model.name",
                "model.name is empty, falling back to the default model",
            ));
        }

        if let Some(t) = self.model.temperature
            && !(0.0..=2.0).contains(&t)
        {
            issues.push(ConfigIssue::warning(
                "model.temperature",
                format!("model.temperature {} is outside 0.0..=2.0", t),
            ));
        }

        if self.turn.max_tool_rounds == 0 {
            issues.push(ConfigIssue::warning(
                "turn.max_tool_rounds",
                "turn.max_tool_rounds is 0, every tool call will end the turn",
            ));
        }

        if self.platform.personalize.request_timeout_seconds == 0 {
            issues.push(ConfigIssue::error(
                "platform.personalize.request_timeout_seconds",
                "platform.personalize.request_timeout_seconds cannot be 0",
            ));
        }

        issues
    }

    /// Fail on error-level issues; hand back the warnings.
    pub fn ensure_valid(&self) -> Result<Vec<ConfigIssue>, ConfigValidationError> {
        let (errors, warnings): (Vec<_>, Vec<_>) = self
            .validate()
            .into_iter()
            .partition(|issue| issue.severity == Severity::Error);

        if errors.is_empty() {
            return Ok(warnings);
        }
        Err(ConfigValidationError {
            summary: errors
                .iter()
                .map(|i| i.message.as_str())
                .collect::<Vec<_>>()
                .join("; "),
            issues: errors,
        })
    }

    pub fn turn_policy(&self) -> TurnPolicy {
        TurnPolicy::default()
            .with_max_duration(Duration::from_secs(self.server.max_duration_seconds))
            .with_max_tool_rounds(self.turn.max_tool_rounds)
            .with_event_buffer(self.turn.event_buffer)
    }
}
