//! Argument validation against an [`ArgumentSchema`].
//!
//! Validation is depth-first and stops at the first violation. The error
//! carries a dotted field path (`assets.html`, `channels[2]`) and a short
//! reason, rendered as `"<path>: <reason>"` so the model can act on it.
//! Properties the schema does not declare are dropped from the validated
//! arguments rather than rejected.

use super::schema::{ArgumentSchema, SchemaKind};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Path used when the violation is at the root
const ROOT: &str = "arguments";

/// First structural violation found in a set of arguments
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    pub path: String,
    pub reason: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, reason: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            path: if path.is_empty() { ROOT.to_string() } else { path },
            reason: reason.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path, self.reason)
    }
}

impl std::error::Error for ValidationError {}

/// Arguments that passed validation, with undeclared properties removed
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ValidatedArguments(Value);

impl ValidatedArguments {
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(Value::as_i64)
    }

    /// String items of an array argument
    pub fn get_str_list(&self, key: &str) -> Vec<&str> {
        self.get(key)
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }
}

/// Validate `raw` against `schema`.
pub fn validate(schema: &ArgumentSchema, raw: &Value) -> Result<ValidatedArguments, ValidationError> {
    check(schema, raw, "").map(ValidatedArguments)
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_i64() || n.is_u64() => "integer",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn mismatch(schema: &ArgumentSchema, value: &Value, path: &str) -> ValidationError {
    ValidationError::new(
        path,
        format!("expected {}, got {}", schema.type_name(), json_type(value)),
    )
}

fn join(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", path, key)
    }
}

fn check(schema: &ArgumentSchema, value: &Value, path: &str) -> Result<Value, ValidationError> {
    match &schema.kind {
        SchemaKind::String {
            min_length,
            allowed,
        } => {
            let s = value.as_str().ok_or_else(|| mismatch(schema, value, path))?;
            if let Some(min) = min_length {
                let len = s.trim().chars().count();
                if len < *min {
                    let reason = if *min == 1 {
                        "must not be empty".to_string()
                    } else {
                        format!("must be at least {} characters", min)
                    };
                    return Err(ValidationError::new(path, reason));
                }
            }
            if let Some(values) = allowed
                && !values.iter().any(|v| v == s)
            {
                return Err(ValidationError::new(
                    path,
                    format!("'{}' is not one of {}", s, values.join(", ")),
                ));
            }
            Ok(value.clone())
        }
        SchemaKind::Integer { minimum, maximum } => {
            let n = value.as_i64().ok_or_else(|| mismatch(schema, value, path))?;
            if let Some(min) = minimum
                && n < *min
            {
                return Err(ValidationError::new(path, format!("must be at least {}", min)));
            }
            if let Some(max) = maximum
                && n > *max
            {
                return Err(ValidationError::new(path, format!("must be at most {}", max)));
            }
            Ok(value.clone())
        }
        SchemaKind::Number => {
            if value.is_number() {
                Ok(value.clone())
            } else {
                Err(mismatch(schema, value, path))
            }
        }
        SchemaKind::Boolean => {
            if value.is_boolean() {
                Ok(value.clone())
            } else {
                Err(mismatch(schema, value, path))
            }
        }
        SchemaKind::Array { items, min_items } => {
            let elements = value.as_array().ok_or_else(|| mismatch(schema, value, path))?;
            if let Some(min) = min_items
                && elements.len() < *min
            {
                let reason = if *min == 1 {
                    "at least one entry required".to_string()
                } else {
                    format!("at least {} entries required", min)
                };
                return Err(ValidationError::new(path, reason));
            }
            elements
                .iter()
                .enumerate()
                .map(|(i, element)| check(items, element, &format!("{}[{}]", path, i)))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array)
        }
        SchemaKind::Object { properties } => {
            let fields = value.as_object().ok_or_else(|| mismatch(schema, value, path))?;
            let mut out = Map::new();
            for property in properties {
                let field_path = join(path, &property.name);
                match fields.get(&property.name) {
                    None | Some(Value::Null) => {
                        if property.required {
                            return Err(ValidationError::new(field_path, "is required"));
                        }
                    }
                    Some(field) => {
                        let checked = check(&property.schema, field, &field_path)?;
                        out.insert(property.name.clone(), checked);
                    }
                }
            }
            Ok(Value::Object(out))
        }
    }
}
