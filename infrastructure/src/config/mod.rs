//! Configuration file loading for asset-assistant
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. Environment: `ASSET_ASSISTANT_<SECTION>__<KEY>`
//! 2. `--config <path>` specified file
//! 3. Project root: `./assistant.toml` or `./.assistant.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/asset-assistant/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigIssue, ConfigValidationError, FRAMINGS, FileConfig, FileLoggingConfig, FileModelConfig,
    FileOpenAiConfig, FilePersonalizeConfig, FilePlatformConfig, FileProvidersConfig,
    FileServerConfig, FileTurnConfig, Severity,
};
pub use loader::ConfigLoader;
