//! Tool domain value objects: results and error codes
//!
//! Every [`ToolCall`](super::entities::ToolCall) that reaches the executing
//! stage produces exactly one [`ToolInvocationResult`], successful or not.
//! Failures are values, not errors: they go back to the model as a `tool`
//! message so it can correct itself.
//!
//! | Code | Produced when | Remote call made? |
//! |------|---------------|-------------------|
//! | `INVALID_ARGUMENT` | arguments fail validation | No |
//! | `NOT_FOUND` | tool not declared for this request | No |
//! | `EXECUTION_FAILED` | remote operation failed | Yes (may be partially applied) |
//! | `TIMEOUT` | remote operation exceeded its deadline | Yes (outcome unknown) |

use serde::{Deserialize, Serialize};

/// Error carried by a failed tool result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolError {
    /// Error code (e.g., "NOT_FOUND", "INVALID_ARGUMENT")
    pub code: String,
    /// Human-readable error message
    pub message: String,
}

impl ToolError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn not_found(tool_name: impl Into<String>) -> Self {
        Self::new(
            "NOT_FOUND",
            format!("Tool not available: {}", tool_name.into()),
        )
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new("INVALID_ARGUMENT", message)
    }

    pub fn execution_failed(message: impl Into<String>) -> Self {
        Self::new("EXECUTION_FAILED", message)
    }

    pub fn timeout(operation: impl Into<String>) -> Self {
        Self::new(
            "TIMEOUT",
            format!("Operation timed out: {}", operation.into()),
        )
    }

    /// Whether the model can fix this by changing its request
    pub fn is_correctable(&self) -> bool {
        matches!(self.code.as_str(), "INVALID_ARGUMENT" | "NOT_FOUND")
    }
}

impl std::fmt::Display for ToolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for ToolError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvocationStatus {
    Success,
    Failure,
}

/// Outcome of one tool call, keyed by the call's id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolInvocationResult {
    pub call_id: String,
    pub tool_name: String,
    pub status: InvocationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ToolError>,
}

impl ToolInvocationResult {
    pub fn success(
        call_id: impl Into<String>,
        tool_name: impl Into<String>,
        payload: serde_json::Value,
    ) -> Self {
        Self {
            call_id: call_id.into(),
            tool_name: tool_name.into(),
            status: InvocationStatus::Success,
            payload: Some(payload),
            error: None,
        }
    }

    pub fn failure(
        call_id: impl Into<String>,
        tool_name: impl Into<String>,
        error: ToolError,
    ) -> Self {
        Self {
            call_id: call_id.into(),
            tool_name: tool_name.into(),
            status: InvocationStatus::Failure,
            payload: None,
            error: Some(error),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == InvocationStatus::Success
    }

    /// Text of the `tool` message fed back to the model
    pub fn to_model_content(&self) -> String {
        match (&self.payload, &self.error) {
            (Some(payload), _) if self.is_success() => payload.to_string(),
            (_, Some(error)) if error.is_correctable() => format!(
                "Error {}. Correct the arguments and call {} again.",
                error, self.tool_name
            ),
            (_, Some(error)) => format!("Error {}. Do not retry automatically.", error),
            _ => String::new(),
        }
    }
}
