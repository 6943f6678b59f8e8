//! Declared argument shapes.
//!
//! An [`ArgumentSchema`] is a small, closed subset of JSON Schema: exactly
//! what the validator enforces and nothing more. The same value renders the
//! JSON Schema sent to the model ([`ArgumentSchema::to_json_schema`]) so the
//! declaration the model sees and the checks applied to its output can never
//! drift apart.

use serde_json::{Map, Value, json};

/// Structural kind of a schema node
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaKind {
    String {
        min_length: Option<usize>,
        allowed: Option<Vec<String>>,
    },
    Integer {
        minimum: Option<i64>,
        maximum: Option<i64>,
    },
    Number,
    Boolean,
    Array {
        items: Box<ArgumentSchema>,
        min_items: Option<usize>,
    },
    Object {
        properties: Vec<Property>,
    },
}

/// Named member of an object schema
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub name: String,
    pub schema: ArgumentSchema,
    pub required: bool,
}

/// A schema node with an optional description
#[derive(Debug, Clone, PartialEq)]
pub struct ArgumentSchema {
    pub kind: SchemaKind,
    pub description: Option<String>,
}

impl ArgumentSchema {
    fn of(kind: SchemaKind) -> Self {
        Self {
            kind,
            description: None,
        }
    }

    pub fn string() -> Self {
        Self::of(SchemaKind::String {
            min_length: None,
            allowed: None,
        })
    }

    /// String restricted to a fixed set of values
    pub fn one_of<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::of(SchemaKind::String {
            min_length: None,
            allowed: Some(values.into_iter().map(Into::into).collect()),
        })
    }

    pub fn integer() -> Self {
        Self::of(SchemaKind::Integer {
            minimum: None,
            maximum: None,
        })
    }

    pub fn number() -> Self {
        Self::of(SchemaKind::Number)
    }

    pub fn boolean() -> Self {
        Self::of(SchemaKind::Boolean)
    }

    pub fn array(items: ArgumentSchema) -> Self {
        Self::of(SchemaKind::Array {
            items: Box::new(items),
            min_items: None,
        })
    }

    pub fn object() -> Self {
        Self::of(SchemaKind::Object {
            properties: Vec::new(),
        })
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Minimum string length, counted after trimming whitespace. No effect
    /// on other kinds.
    pub fn min_length(mut self, min: usize) -> Self {
        if let SchemaKind::String { min_length, .. } = &mut self.kind {
            *min_length = Some(min);
        }
        self
    }

    /// Minimum array length. No effect on other kinds.
    pub fn min_items(mut self, min: usize) -> Self {
        if let SchemaKind::Array { min_items, .. } = &mut self.kind {
            *min_items = Some(min);
        }
        self
    }

    /// Inclusive integer range. No effect on other kinds.
    pub fn range(mut self, min: i64, max: i64) -> Self {
        if let SchemaKind::Integer { minimum, maximum } = &mut self.kind {
            *minimum = Some(min);
            *maximum = Some(max);
        }
        self
    }

    pub fn required(self, name: impl Into<String>, schema: ArgumentSchema) -> Self {
        self.property(name, schema, true)
    }

    pub fn optional(self, name: impl Into<String>, schema: ArgumentSchema) -> Self {
        self.property(name, schema, false)
    }

    fn property(mut self, name: impl Into<String>, schema: ArgumentSchema, required: bool) -> Self {
        if let SchemaKind::Object { properties } = &mut self.kind {
            properties.push(Property {
                name: name.into(),
                schema,
                required,
            });
        }
        self
    }

    /// Name of the JSON type this node accepts
    pub fn type_name(&self) -> &'static str {
        match &self.kind {
            SchemaKind::String { .. } => "string",
            SchemaKind::Integer { .. } => "integer",
            SchemaKind::Number => "number",
            SchemaKind::Boolean => "boolean",
            SchemaKind::Array { .. } => "array",
            SchemaKind::Object { .. } => "object",
        }
    }

    /// Render as JSON Schema
    pub fn to_json_schema(&self) -> Value {
        let mut node = Map::new();
        node.insert("type".to_string(), json!(self.type_name()));
        if let Some(description) = &self.description {
            node.insert("description".to_string(), json!(description));
        }

        match &self.kind {
            SchemaKind::String {
                min_length,
                allowed,
            } => {
                if let Some(min) = min_length {
                    node.insert("minLength".to_string(), json!(min));
                }
                if let Some(values) = allowed {
                    node.insert("enum".to_string(), json!(values));
                }
            }
            SchemaKind::Integer { minimum, maximum } => {
                if let Some(min) = minimum {
                    node.insert("minimum".to_string(), json!(min));
                }
                if let Some(max) = maximum {
                    node.insert("maximum".to_string(), json!(max));
                }
            }
            SchemaKind::Number | SchemaKind::Boolean => {}
            SchemaKind::Array { items, min_items } => {
                node.insert("items".to_string(), items.to_json_schema());
                if let Some(min) = min_items {
                    node.insert("minItems".to_string(), json!(min));
                }
            }
            SchemaKind::Object { properties } => {
                let mut props = Map::new();
                let mut required = Vec::new();
                for property in properties {
                    props.insert(property.name.clone(), property.schema.to_json_schema());
                    if property.required {
                        required.push(json!(property.name));
                    }
                }
                node.insert("properties".to_string(), Value::Object(props));
                node.insert("required".to_string(), Value::Array(required));
            }
        }

        Value::Object(node)
    }
}
