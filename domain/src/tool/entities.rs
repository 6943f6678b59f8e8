//! Tool domain entities

use super::schema::ArgumentSchema;
use crate::core::product::PlatformProduct;
use serde::{Deserialize, Serialize};

/// What a tool does to the remote platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolCapability {
    /// Reads platform state only (e.g., listing experiences)
    ReadOnly,
    /// Creates or changes platform state; never assumed idempotent
    Mutating,
}

impl ToolCapability {
    pub fn as_str(&self) -> &str {
        match self {
            ToolCapability::ReadOnly => "read_only",
            ToolCapability::Mutating => "mutating",
        }
    }

    pub fn is_idempotent(&self) -> bool {
        matches!(self, ToolCapability::ReadOnly)
    }
}

impl std::fmt::Display for ToolCapability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Declaration of a tool as presented to the model
#[derive(Debug, Clone, PartialEq)]
pub struct ToolDeclaration {
    /// Unique name of the tool (e.g., "create_personalization_experience")
    pub name: String,
    /// Human-readable description
    pub description: String,
    /// Shape the arguments must match
    pub argument_schema: ArgumentSchema,
    /// Product whose credentials the tool needs
    pub bound_product: PlatformProduct,
    /// Side-effect category
    pub capability: ToolCapability,
}

impl ToolDeclaration {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        bound_product: PlatformProduct,
        capability: ToolCapability,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            argument_schema: ArgumentSchema::object(),
            bound_product,
            capability,
        }
    }

    pub fn with_schema(mut self, schema: ArgumentSchema) -> Self {
        self.argument_schema = schema;
        self
    }

    /// Provider-neutral function declaration (name, description, JSON Schema)
    pub fn to_function_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "name": self.name,
            "description": self.description,
            "parameters": self.argument_schema.to_json_schema(),
        })
    }
}

/// A tool invocation requested by the model.
///
/// Arguments are kept exactly as the model produced them; they may not even
/// be valid JSON until the validator has looked at them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Provider-assigned call identifier, unique within a turn
    pub call_id: String,
    /// Name of the tool to call
    pub tool_name: String,
    /// Raw argument text
    pub raw_arguments: String,
}

impl ToolCall {
    pub fn new(
        call_id: impl Into<String>,
        tool_name: impl Into<String>,
        raw_arguments: impl Into<String>,
    ) -> Self {
        Self {
            call_id: call_id.into(),
            tool_name: tool_name.into(),
            raw_arguments: raw_arguments.into(),
        }
    }

    /// Parse the raw arguments. Empty text is treated as an empty object.
    pub fn parsed_arguments(&self) -> Result<serde_json::Value, serde_json::Error> {
        if self.raw_arguments.trim().is_empty() {
            return Ok(serde_json::Value::Object(serde_json::Map::new()));
        }
        serde_json::from_str(&self.raw_arguments)
    }

    /// Arguments for display: parsed when possible, raw text otherwise.
    pub fn display_arguments(&self) -> serde_json::Value {
        self.parsed_arguments()
            .unwrap_or_else(|_| serde_json::Value::String(self.raw_arguments.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capability() {
        assert!(ToolCapability::ReadOnly.is_idempotent());
        assert!(!ToolCapability::Mutating.is_idempotent());
        assert_eq!(ToolCapability::Mutating.to_string(), "mutating");
    }

    #[test]
    fn test_function_schema_shape() {
        let decl = ToolDeclaration::new(
            "list_things",
            "List things",
            PlatformProduct::PersonalizeCdp,
            ToolCapability::ReadOnly,
        )
        .with_schema(ArgumentSchema::object().optional("limit", ArgumentSchema::integer()));

        let schema = decl.to_function_schema();
        assert_eq!(schema["name"], "list_things");
        assert_eq!(schema["description"], "List things");
        assert_eq!(schema["parameters"]["type"], "object");
        assert_eq!(schema["parameters"]["properties"]["limit"]["type"], "integer");
    }

    #[test]
    fn test_parsed_arguments() {
        let call = ToolCall::new("call_1", "t", r#"{"name":"Launch"}"#);
        assert_eq!(call.parsed_arguments().unwrap()["name"], "Launch");

        let empty = ToolCall::new("call_2", "t", "  ");
        assert!(empty.parsed_arguments().unwrap().as_object().unwrap().is_empty());

        let broken = ToolCall::new("call_3", "t", r#"{"name":"#);
        assert!(broken.parsed_arguments().is_err());
        assert_eq!(broken.display_arguments(), serde_json::json!(r#"{"name":"#));
    }
}
