//! Asset platform configuration from TOML (`[platform]` section)

use serde::{Deserialize, Serialize};

/// Sitecore Personalize endpoints. Credentials never live here; they arrive
/// with each request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FilePersonalizeConfig {
    /// OAuth token endpoint
    pub auth_url: String,
    /// OAuth audience
    pub audience: String,
    /// REST API base URL (region specific)
    pub api_base_url: String,
    /// Deadline for each HTTP call to the platform (default: 20)
    pub request_timeout_seconds: u64,
}

impl Default for FilePersonalizeConfig {
    fn default() -> Self {
        Self {
            auth_url: "https://auth.sitecorecloud.io/oauth/token".to_string(),
            audience: "https://api.sitecorecloud.io".to_string(),
            api_base_url: "https://api-engage-us.sitecorecloud.io".to_string(),
            request_timeout_seconds: 20,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FilePlatformConfig {
    pub personalize: FilePersonalizeConfig,
}
