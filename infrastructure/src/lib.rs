//! Infrastructure layer for asset-assistant
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod logging;
pub mod personalize;
pub mod providers;

// Re-export commonly used types
pub use config::{
    ConfigIssue, ConfigLoader, ConfigValidationError, FileConfig, FileOpenAiConfig,
    FilePersonalizeConfig, Severity,
};
pub use logging::JsonlConversationLogger;
pub use personalize::{PersonalizeClient, PersonalizeError, builtin_registry};
pub use providers::OpenAiGateway;
