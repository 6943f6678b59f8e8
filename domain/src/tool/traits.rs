//! Tool domain traits
//!
//! Pure validation of a model-produced [`ToolCall`] against the
//! [`ToolDeclaration`] it names. Dispatch lives in the application layer.

use super::entities::{ToolCall, ToolDeclaration};
use super::validation::{ValidatedArguments, ValidationError, validate};

/// Validator for tool calls
pub trait ToolValidator: Send + Sync {
    /// Validate a tool call's raw arguments against its declaration
    fn validate(
        &self,
        call: &ToolCall,
        declaration: &ToolDeclaration,
    ) -> Result<ValidatedArguments, ValidationError>;
}

/// Default implementation: parse the raw JSON, then check it against the
/// declared argument schema.
#[derive(Debug, Clone, Default)]
pub struct DefaultToolValidator;

impl ToolValidator for DefaultToolValidator {
    fn validate(
        &self,
        call: &ToolCall,
        declaration: &ToolDeclaration,
    ) -> Result<ValidatedArguments, ValidationError> {
        let raw = call
            .parsed_arguments()
            .map_err(|e| ValidationError::new("", format!("not valid JSON ({})", e)))?;
        validate(&declaration.argument_schema, &raw)
    }
}
