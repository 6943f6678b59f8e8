//! Tool Executor port
//!
//! Defines the contract of a remote operation: the side-effecting half of a
//! registered tool.

use assistant_domain::{ClientConfiguration, ValidatedArguments};
use async_trait::async_trait;
use serde_json::Value;

/// Normalized outcome of a remote operation.
///
/// Transport errors and non-success responses are values of this type; an
/// executor never returns them any other way.
#[derive(Debug, Clone, PartialEq)]
pub enum RemoteResult {
    /// The operation succeeded; carries the created or fetched asset descriptor
    Success(Value),
    /// The operation failed; the effect may have been partially applied
    Failure(String),
    /// No answer within the deadline; the outcome is unknown
    TimedOut(String),
}

impl RemoteResult {
    pub fn is_success(&self) -> bool {
        matches!(self, RemoteResult::Success(_))
    }
}

/// Port for remote operations
///
/// Each invocation performs its network call at most once. Retrying is the
/// caller's decision, since the operation may not be idempotent.
#[async_trait]
pub trait ToolExecutor: Send + Sync {
    /// Run the operation with already-validated arguments, authenticated by
    /// the configuration whose product matches the tool.
    async fn invoke(
        &self,
        arguments: &ValidatedArguments,
        configuration: &ClientConfiguration,
    ) -> RemoteResult;
}
