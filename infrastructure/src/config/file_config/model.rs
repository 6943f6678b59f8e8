//! Model configuration from TOML (`[model]` section)

use assistant_domain::Model;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileModelConfig {
    /// Model identifier sent to the provider (default: "gpt-4o-mini")
    pub name: String,
    /// Sampling temperature; provider default when unset
    pub temperature: Option<f32>,
}

impl Default for FileModelConfig {
    fn default() -> Self {
        Self {
            name: Model::default().to_string(),
            temperature: None,
        }
    }
}

impl FileModelConfig {
    /// Parse the model name, falling back to the default for a blank name.
    pub fn parse_model(&self) -> Model {
        let Ok(model) = self.name.trim().parse::<Model>();
        if model.is_blank() {
            Model::default()
        } else {
            model
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_model() {
        let custom = FileModelConfig {
            name: "my-finetune".to_string(),
            temperature: None,
        };
        assert_eq!(custom.parse_model(), Model::Custom("my-finetune".to_string()));

        let blank = FileModelConfig {
            name: String::new(),
            temperature: None,
        };
        assert_eq!(blank.parse_model(), Model::Gpt4oMini);
    }
}
